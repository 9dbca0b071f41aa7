use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "targetboard",
    version,
    about = "community target-list board client",
    long_about = "targetboard lists, filters and renders the targets of a community target board, and adds, removes or completes them through the board's JSON API.\n\nExamples:\n  targetboard list --priority critical\n  targetboard list --search toxic --format html -o board.html\n  targetboard --base-url https://board.example/ complete 42\n\nTip: Use --config to persist the server URL and session cookie."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.targetboard/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'u',
        long = "base-url",
        visible_alias = "url",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "Board server base URL."
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'x',
        long = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "Proxy URL for all requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "cookie",
        value_name = "COOKIE",
        global = true,
        help_heading = "HTTP",
        help = "Cookie header sent with every request (e.g. a session cookie)."
    )]
    pub cookie: Option<String>,

    #[arg(
        short = 'y',
        long = "yes",
        global = true,
        help_heading = "Actions",
        help = "Do not ask for confirmation."
    )]
    pub yes: bool,

    #[arg(
        long = "no-fallback",
        global = true,
        help_heading = "Actions",
        help = "Fail instead of showing sample targets when the server is unreachable."
    )]
    pub no_fallback: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List active targets.
    List(ListArgs),
    /// Show board statistics.
    Stats,
    /// Add a new target.
    Add(AddArgs),
    /// Delete a target.
    Remove {
        #[arg(value_name = "ID")]
        id: u64,
    },
    /// Mark a target as completed.
    Complete {
        #[arg(value_name = "ID")]
        id: u64,
    },
    /// Delete an image from the gallery.
    GalleryDelete {
        #[arg(value_name = "FILENAME")]
        filename: String,
    },
    /// Print the HTML preview of a custom role style.
    RolePreview(RoleArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(short = 'g', long = "gamemode", value_name = "MODE", help = "Only this game mode.")]
    pub gamemode: Option<String>,

    #[arg(
        short = 'p',
        long = "priority",
        value_name = "PRIORITY",
        help = "Only this priority (low, medium, high, critical)."
    )]
    pub priority: Option<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help = "Case-insensitive search over nickname, server and reason."
    )]
    pub search: Option<String>,

    #[arg(
        short = 't',
        long = "tags",
        value_name = "TAGS",
        help = "Comma-separated tag fragments; any match keeps the target."
    )]
    pub tags: Option<String>,

    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help = "Output format: text, json or html (inferred from --output when omitted)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write output to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(long = "admin", help = "Render admin actions on cards.")]
    pub admin: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    #[arg(long = "nickname", value_name = "NICK")]
    pub nickname: String,

    #[arg(long = "gamemode", value_name = "MODE")]
    pub gamemode: String,

    #[arg(long = "server", value_name = "HOST")]
    pub server: String,

    #[arg(long = "reason", value_name = "TEXT")]
    pub reason: String,

    #[arg(long = "priority", value_name = "PRIORITY", default_value = "medium")]
    pub priority: String,

    #[arg(long = "tags", value_name = "TAGS", default_value = "")]
    pub tags: String,

    #[arg(long = "description", value_name = "TEXT", default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RoleArgs {
    #[arg(long = "text", default_value = "")]
    pub text: String,
    #[arg(long = "emoji", default_value = "")]
    pub emoji: String,
    #[arg(long = "color", value_name = "HEX")]
    pub color: Option<String>,
    #[arg(long = "gradient")]
    pub gradient: bool,
    #[arg(long = "gradient-start", value_name = "HEX")]
    pub gradient_start: Option<String>,
    #[arg(long = "gradient-end", value_name = "HEX")]
    pub gradient_end: Option<String>,
    #[arg(long = "background", value_name = "HEX")]
    pub background: Option<String>,
    #[arg(long = "glow")]
    pub glow: bool,
    #[arg(long = "glow-color", value_name = "HEX")]
    pub glow_color: Option<String>,
    #[arg(long = "shadow")]
    pub shadow: bool,
    #[arg(long = "shadow-color", value_name = "HEX")]
    pub shadow_color: Option<String>,
    #[arg(long = "border")]
    pub border: bool,
    #[arg(long = "border-color", value_name = "HEX")]
    pub border_color: Option<String>,
    #[arg(long = "font-weight")]
    pub font_weight: Option<String>,
    #[arg(long = "font-style")]
    pub font_style: Option<String>,
    #[arg(long = "text-transform")]
    pub text_transform: Option<String>,
    #[arg(long = "animated")]
    pub animated: bool,
    #[arg(long = "animation-speed", value_name = "DURATION")]
    pub animation_speed: Option<String>,
}
