use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{config, name, open, recent, share, watched};
use watchbook_config::{Config, PathManager};
use watchbook_models::MovieRef;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchbook")]
#[command(about = "Watchbook - keep track of the movies you've watched and share your list")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Catalog fields identifying a movie
#[derive(Args, Debug, Clone)]
pub struct MovieArgs {
    /// Catalog movie ID
    #[arg(long)]
    id: i64,

    /// Movie title
    #[arg(long)]
    title: String,

    /// Release date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    release_date: String,

    /// Poster image path
    #[arg(long)]
    poster_path: Option<String>,
}

impl MovieArgs {
    pub fn into_movie(self) -> MovieRef {
        MovieRef {
            id: self.id,
            title: self.title,
            release_date: self.release_date,
            poster_path: self.poster_path,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage your watched list
    Watched {
        #[command(subcommand)]
        cmd: WatchedCommands,
    },
    /// Record that you opened a movie's details
    View {
        #[command(flatten)]
        movie: MovieArgs,
    },
    /// Show recently viewed movies (most recent first)
    Recent,
    /// Print a link that shows your watched list to anyone who opens it
    #[command(long_about = "Encode your watched list into a share link. The first time you share, you are asked for a display name, which is remembered for future shares.")]
    Share {
        /// Display name shown to people opening the link (saved for next time)
        #[arg(long)]
        name: Option<String>,
    },
    /// Open a share link and show that person's list
    #[command(long_about = "Decode a share link (or a bare share code) and show the owner's watched list. Use --adopt to copy one of their movies into your own list.")]
    Open {
        /// Share link or share code
        link: String,

        /// Copy this movie ID from the shared list into your own list
        #[arg(long)]
        adopt: Option<i64>,

        /// Your rating for the adopted movie (1-5)
        #[arg(long, requires = "adopt", value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: Option<u8>,

        /// Your comment for the adopted movie
        #[arg(long, requires = "adopt")]
        comment: Option<String>,
    },
    /// Show or change the display name used for share links
    Name {
        /// New display name
        #[arg(long)]
        set: Option<String>,
    },
    /// Show or initialise configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List watched movies in the order they were added
    List {
        /// Only show the N most recently added
        #[arg(long)]
        latest: Option<usize>,
    },
    /// Mark a movie as watched, or update its rating/comment
    #[command(long_about = "Mark a movie as watched. If it is already on your list, a non-zero --rating or non-empty --comment updates the stored value; zero or empty leaves it unchanged.")]
    Add {
        #[command(flatten)]
        movie: MovieArgs,

        /// Star rating (1-5, 0 = unrated)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: Option<u8>,

        /// Free-text comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Remove a movie from the watched list
    Remove {
        /// Catalog movie ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show file locations and current settings
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Watched { cmd } => match cmd {
            WatchedCommands::List { latest } => watched::run_list(&paths, &config, latest, &output),
            WatchedCommands::Add { movie, rating, comment } => {
                watched::run_add(&paths, &config, movie.into_movie(), rating, comment, &output)
            }
            WatchedCommands::Remove { id } => watched::run_remove(&paths, &config, id, &output),
        },
        Commands::View { movie } => recent::run_view(&paths, &config, movie.into_movie(), &output),
        Commands::Recent => recent::run_list(&paths, &config, &output),
        Commands::Share { name } => share::run_share(&paths, &config, name, &output),
        Commands::Open { link, adopt, rating, comment } => {
            open::run_open(&paths, &config, &link, adopt, rating, comment, &output)
        }
        Commands::Name { set } => name::run_name(&paths, &config, set, &output),
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config::run_show(&paths, &config, &output),
            ConfigCommands::Init { force } => config::run_init(&paths, force, &output),
        },
    }
}
