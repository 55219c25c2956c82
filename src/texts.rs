// User-facing reply texts.

pub const WELCOME: &str = "🗺️ Welcome to the cache hunt!\n\n🔍 Type a codeword to start searching for a cache.\n\n💡 Tip: codewords are at least 3 characters long";

pub const UNKNOWN_COMMAND: &str =
    "🤔 Unknown command.\n\nType a codeword to search for a cache, or /stop to stop a hunt.";

pub const CODEWORD_TOO_SHORT: &str = "The codeword must be at least 3 characters long.";

pub const CACHE_NOT_FOUND: &str =
    "🔍 No cache matches that codeword.\n\nCheck the spelling and try again.";

pub const CACHE_GONE: &str =
    "⚠️ The cache you were hunting no longer exists.\n\nType a new codeword to start another search.";

pub const HUNT_STOPPED: &str =
    "🛑 Hunt stopped.\n\nType a new codeword to start searching again.";

pub const NOTHING_TO_STOP: &str =
    "ℹ️ You have no active hunt.\n\nType a codeword to start one.";

pub const SHARE_LOCATION_REMINDER: &str =
    "Please share your location to keep hunting.\n\nUse /stop to stop the search.";

pub const STATIC_LOCATION_REJECTED: &str = "❌ That was a one-shot location pin!

📍 Navigation needs a LIVE location broadcast:

1️⃣ Tap the attach icon 📎 in the input field
2️⃣ Choose \"Location\" 🗺️
3️⃣ Choose \"Share live location\" ⏱️
4️⃣ Pick a duration and tap \"Share\"

⚠️ It must be a live broadcast, not a single pin!";

pub const TRANSIENT_ERROR: &str = "Something went wrong. Please try again.";

pub const MEDIA_UNAVAILABLE: &str = "Unfortunately the photo of the spot could not be delivered.";

pub const ARRIVAL_CAPTION: &str =
    "🏆 Hunt complete! Type a new codeword to find the next cache.";

// ── Admin wizard ──────────────────────────────────────────────────────

pub const ADMIN_WELCOME: &str = "👑 Welcome, administrator!

🔧 Cache creation:
• /create - hide a new cache
• /stop - cancel cache creation

🔍 Testing mode:
• Type a codeword to hunt a cache like a regular user
• /stop - stop the hunt

Switching between modes is automatic.";

pub const ADMIN_UNKNOWN_COMMAND: &str =
    "Unknown admin command. Available:\n/create - hide a new cache\n/stop - cancel cache creation";

pub const ADMIN_USE_CREATE: &str = "Use /create to hide a new cache.";

pub const WIZARD_ASK_CODEWORD: &str = "🔑 Pick a codeword for the new cache:";

pub const WIZARD_CODEWORD_TOO_SHORT: &str =
    "The codeword must be at least 3 characters long. Try another one:";

pub const WIZARD_CODEWORD_TAKEN: &str = "That codeword is already taken! Pick another one:";

pub const WIZARD_ASK_LOCATION: &str = "📍 Got it! Now send the location where the cache is hidden.\n\n💡 A regular one-shot pin works here (no broadcast needed).";

pub const WIZARD_NEED_LOCATION: &str = "Please send a location to continue.";

pub const WIZARD_ASK_MEDIA: &str = "📷 Now send a photo, video, or video note of the spot:";

pub const WIZARD_NEED_MEDIA: &str = "Please send a photo, video, or video note.";

pub const WIZARD_CANCELLED: &str =
    "🛑 Cache creation cancelled.\n\nYou can:\n• /create - hide a new cache\n• Type a codeword to hunt one";

pub fn cache_found(codeword: &str) -> String {
    format!("🎯 Cache found: {codeword}\n\n📍 Start a live location broadcast to begin the hunt")
}

pub fn arrival_congrats(codeword: &str) -> String {
    format!("🎉 Congratulations! You found the cache: {codeword}\n\n📷 Here is the spot:\n\n💡 You can stop sharing your location and hunt for a new cache!")
}

pub fn wizard_done(codeword: &str, latitude: f64, longitude: f64) -> String {
    format!("✅ Cache created!\n\n🔑 Codeword: {codeword}\n📍 Coordinates: {latitude:.6}, {longitude:.6}\n\nUsers can now find it by typing the codeword.")
}
