use std::io;

use ascloc::{
    ALL_KINDS, ApiClient, Config, JwtTokenProvider, LocalizationKind, Outcome, Pipeline, Selector,
};

/// What the interactive pipeline should do.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Ask the user which kind to update.
    Menu,
    Kind(LocalizationKind),
}

fn build_client(config: &Config) -> Result<ApiClient, String> {
    let credentials = config.credentials().map_err(|e| e.to_string())?;
    let tokens = JwtTokenProvider::from_key_file(
        credentials.key_id,
        credentials.issuer_id,
        &credentials.key_path,
        config.token_lifetime,
    )
    .map_err(|e| format!("Cannot load API key '{}': {}", credentials.key_path.display(), e))?;
    ApiClient::new(&config.base_url, Box::new(tokens)).map_err(|e| e.to_string())
}

fn stdin_selector() -> Selector<io::StdinLock<'static>, io::Stdout> {
    Selector::new(io::stdin().lock(), io::stdout())
}

/// Run the apps command: fetch and list every application.
pub fn run_apps_command(config: &Config) -> Result<(), String> {
    let client = build_client(config)?;
    let mut prompt = stdin_selector();
    let apps = Pipeline::new(config, &client, &mut prompt)
        .apps()
        .map_err(|e| e.to_string())?;

    println!("✅ {} application(s)", apps.len());
    for (i, app) in apps.iter().enumerate() {
        println!(
            "{}. {} (sku: {}, id: {})",
            i + 1,
            app.attribute_or_placeholder("name"),
            app.attribute_or_placeholder("sku"),
            app.id
        );
    }
    Ok(())
}

/// Run the interactive fetch, merge and upload flow.
pub fn run_sync_command(config: &Config, action: Action) -> Result<(), String> {
    let client = build_client(config)?;
    let mut prompt = stdin_selector();
    let mut pipeline = Pipeline::new(config, &client, &mut prompt);

    let outcome = match action {
        Action::Menu => pipeline.run_menu(&ALL_KINDS),
        Action::Kind(kind) => pipeline.run(&kind),
    }
    .map_err(|e| e.to_string())?;

    match outcome {
        Outcome::Cancelled => println!("Cancelled"),
        Outcome::Uploaded { report, .. } if !report.is_success() => {
            tracing::warn!(
                sent = report.succeeded.len(),
                total = report.total,
                "upload stopped early"
            );
        }
        _ => {}
    }
    Ok(())
}
