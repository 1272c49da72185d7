// ================= WIFI CREDENTIALS =================
//
// SETUP INSTRUCTIONS:
// 1. Copy this file to 'credentials.rs' in the same directory
// 2. Fill in your WiFi and server details below
// 3. DO NOT commit credentials.rs to git (it's in .gitignore)
//
// Values can also be overridden at build time with the WIFI_SSID,
// WIFI_PASSWORD and SERVER_HOST environment variables.
//
// =====================================================

// Your WiFi network name
pub const SSID: &str = "YOUR_WIFI_SSID";

// Your WiFi password (leave empty for an open network)
pub const PASSWORD: &str = "YOUR_WIFI_PASSWORD";

// IP address of the machine running the respeaker_service container
// Find it with: hostname -I (Linux) or ipconfig (Windows)
pub const HOST: &str = "YOUR_SERVER_IP";
