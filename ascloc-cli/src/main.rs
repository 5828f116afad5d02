mod logging;
mod merge;
mod sync;

use std::path::PathBuf;

use ascloc::{Config, DuplicatePolicy, EVENT_LOCALIZATIONS, LocalizationKind, VERSION_LOCALIZATIONS};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::merge::{MergeOptions, run_merge_command};
use crate::sync::{Action, run_apps_command, run_sync_command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,

    #[command(flatten)]
    common: CommonArgs,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the application list and store it as a snapshot.
    Apps,

    /// Update App Store version localizations (promotional text, what's new).
    Versions,

    /// Update in-app event localizations (name, short and long description).
    Events,

    /// Choose what to update from a menu (default).
    Menu,

    /// Merge a spreadsheet with a saved localization snapshot, without network access.
    Merge {
        /// Which localizations the spreadsheet holds
        #[arg(short, long, value_enum, default_value_t = KindArg::Version)]
        kind: KindArg,

        /// Saved localization listing (e.g. data/applications/<sku>/version_localizations.json)
        #[arg(short, long)]
        server: PathBuf,
    },
}

/// Options shared by all commands.
#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// Spreadsheet to read instead of the default for the chosen kind (.xlsx/.xls/.ods, .csv, or .tsv/.txt)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Where to write the merged batch
    #[arg(long, global = true, default_value = ascloc::config::DEFAULT_MERGED_FILE)]
    merged_file: PathBuf,

    /// Root directory for response snapshots
    #[arg(long, global = true, default_value = ascloc::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// App Store Connect API base URL
    #[arg(long, global = true, env = ascloc::config::BASE_URL_VAR)]
    base_url: Option<String>,

    /// How to handle a locale that appears more than once
    #[arg(long, global = true, value_enum, default_value_t = DuplicateArg::Reject)]
    on_duplicate: DuplicateArg,

    /// Upload without asking for confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Merge and write the batch, but never upload
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    /// App Store version localizations
    Version,
    /// In-app event localizations
    Event,
}

impl From<KindArg> for LocalizationKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Version => VERSION_LOCALIZATIONS,
            KindArg::Event => EVENT_LOCALIZATIONS,
        }
    }
}

/// Strategy for locales that appear more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DuplicateArg {
    /// Stop with an error naming the duplicated locale
    Reject,
    /// Use the first server localization for a locale
    First,
    /// Use the last server localization for a locale
    Last,
}

impl From<DuplicateArg> for DuplicatePolicy {
    fn from(value: DuplicateArg) -> Self {
        match value {
            DuplicateArg::Reject => DuplicatePolicy::Reject,
            DuplicateArg::First => DuplicatePolicy::First,
            DuplicateArg::Last => DuplicatePolicy::Last,
        }
    }
}

impl CommonArgs {
    fn into_config(self) -> Config {
        let mut config = Config::from_env()
            .with_data_dir(self.data_dir)
            .with_merged_file(self.merged_file)
            .with_spreadsheet(self.input)
            .with_duplicate_policy(self.on_duplicate.into())
            .with_assume_yes(self.yes)
            .with_dry_run(self.dry_run);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }
}

fn main() {
    // A missing .env file is fine; variables may come from the shell
    let _ = dotenvy::dotenv();
    logging::init_logging();

    let args = Args::parse();

    let result = match args.commands.unwrap_or(Commands::Menu) {
        Commands::Apps => run_apps_command(&args.common.into_config()),
        Commands::Versions => {
            run_sync_command(&args.common.into_config(), Action::Kind(VERSION_LOCALIZATIONS))
        }
        Commands::Events => {
            run_sync_command(&args.common.into_config(), Action::Kind(EVENT_LOCALIZATIONS))
        }
        Commands::Menu => run_sync_command(&args.common.into_config(), Action::Menu),
        Commands::Merge { kind, server } => run_merge_command(MergeOptions {
            kind: kind.into(),
            server,
            input: args.common.input,
            output: args.common.merged_file,
            policy: args.common.on_duplicate.into(),
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
