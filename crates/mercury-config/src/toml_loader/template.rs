//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Mercury Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[presence]
# Discord user id to track (must be a member of discord.gg/lanyard).
user_id = ""
# api_base = "https://api.lanyard.rest"
# socket_url = "wss://api.lanyard.rest/socket"
# live = true                 # subscribe to the push socket after the first fetch
# live_delay_ms = 1000        # 0-10000
# poll_interval = 30          # seconds, 5-3600; 0 disables polling
# request_timeout = 8         # seconds, 1-30
# connect_timeout = 15        # seconds, 1-60
# reconnect_delay = 10        # seconds, 1-300

[fallback]
# Placeholder profile shown while live data is unavailable.
# display_name = "Delta"
# activity_name = "Visual Studio Code"
# activity_details = "Editing TypeScript"
# activity_state = "Working on Portfolio"
# application_id = "383226320970055681"
# started_minutes_ago = 30

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
    .to_string()
}
