use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use hub_logging::hub_info;
use nerdhub_client::{AuthContext, ClaimsFileProvider, StateFile};
use nerdhub_core::{
    gate, update, AppState, GatedPage, MappingForm, Msg, OperationPhaseLabel, OperationView,
    SortDirection, UpdateForm,
};

use crate::cli::{Cli, Commands, FeaturedQuote, GamesArgs, PrefsCommand, QuotesArgs};
use crate::config::AppConfig;
use crate::persistence;
use crate::render;
use crate::runtime::Session;

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_options(&cli.global)?;
    match cli.command {
        Commands::Games(args) => games(&config, args),
        Commands::Game { appid, refresh } => game(&config, appid, refresh),
        Commands::Quotes(args) => quotes(&config, args),
        Commands::Quote(which) => featured_quote(&config, which),
        Commands::DeleteQuote { id } => delete_quote(&config, id),
        Commands::Mappings => mappings(&config),
        Commands::SetMapping {
            steam_id,
            username,
            nickname,
        } => set_mapping(
            &config,
            MappingForm {
                steam_id,
                username,
                nickname: nickname.unwrap_or_default(),
            },
        ),
        Commands::UpdateGames {
            steam_ids,
            app_ids,
            override_existing,
        } => update_games(
            &config,
            UpdateForm {
                steam_ids,
                app_ids: app_ids.unwrap_or_default(),
                override_existing,
            },
        ),
        Commands::About => about(&config),
        Commands::Profile => profile(&config),
        Commands::Login { claims } => login(&config, claims),
        Commands::Logout => logout(&config),
        Commands::Prefs(command) => prefs(&config, command),
    }
}

fn session(config: &AppConfig) -> Result<Session> {
    let prefs = persistence::load_preferences(&config.prefs_path());
    Session::connect(config, prefs)
}

fn games(config: &AppConfig, args: GamesArgs) -> Result<()> {
    let mut session = session(config)?;

    let mut query = session.state().game_query().clone();
    if let Some(search) = args.search {
        query.filter.search = search;
    }
    query.filter.owners.extend(args.owners);
    query.filter.categories.extend(args.categories);
    query.filter.free_only |= args.free_only;
    query.filter.on_sale_only |= args.on_sale;
    if let Some(field) = args.sort {
        query.sort.field = field;
    }
    if args.desc {
        query.sort.direction = SortDirection::Descending;
    } else if args.asc {
        query.sort.direction = SortDirection::Ascending;
    }
    session.send(Msg::GameQueryChanged(query));
    session.run_quiet(Msg::GamesRequested);

    let view = session.view();
    if let Some(error) = &view.games.error {
        bail!("{error}");
    }
    print!("{}", render::games(&view.games));

    if args.save {
        persistence::save_preferences(&config.prefs_path(), &session.state().preferences())?;
    }
    Ok(())
}

fn game(config: &AppConfig, appid: u32, refresh: bool) -> Result<()> {
    let mut session = session(config)?;
    let first = if refresh {
        Msg::GameRefreshRequested { appid }
    } else {
        Msg::GameDetailsRequested { appid }
    };
    session.run_quiet(first);

    let detail = session.view().detail.unwrap_or_default();
    if let Some(error) = &detail.error {
        bail!("{error}");
    }
    print!("{}", render::game_detail(&detail));
    Ok(())
}

fn quotes(config: &AppConfig, args: QuotesArgs) -> Result<()> {
    let mut session = session(config)?;

    let mut query = session.state().quote_query().clone();
    if let Some(search) = args.search {
        query.filter.search = search;
    }
    query.filter.authors.extend(args.authors);
    if let Some(field) = args.sort {
        query.sort.field = field;
    }
    if args.desc {
        query.sort.direction = SortDirection::Descending;
    } else if args.asc {
        query.sort.direction = SortDirection::Ascending;
    }
    session.send(Msg::QuoteQueryChanged(query));
    session.run_quiet(Msg::QuotesRequested);

    let view = session.view();
    if let Some(error) = &view.quotes.error {
        bail!("{error}");
    }
    print!("{}", render::quotes(&view.quotes));
    Ok(())
}

fn featured_quote(config: &AppConfig, which: FeaturedQuote) -> Result<()> {
    let mut session = session(config)?;
    session.run_quiet(match which {
        FeaturedQuote::Random => Msg::RandomQuoteRequested,
        FeaturedQuote::Daily => Msg::DailyQuoteRequested,
    });

    let view = session.view();
    if let Some(error) = &view.quotes.error {
        bail!("{error}");
    }
    match view.quotes.featured {
        Some(quote) => println!("{}", render::quote(&quote)),
        None => println!("No quote available"),
    }
    Ok(())
}

fn delete_quote(config: &AppConfig, id: String) -> Result<()> {
    let mut session = session(config)?;
    session.run_quiet(Msg::QuoteDeleteRequested { id: id.clone() });

    if let Some(error) = &session.view().quotes.error {
        bail!("{error}");
    }
    hub_info!("Deleted quote {}", id);
    println!("Deleted quote {id}");
    Ok(())
}

fn mappings(config: &AppConfig) -> Result<()> {
    let mut session = session(config)?;
    session.run_quiet(Msg::UserMappingsRequested);

    let admin = session.view().admin;
    if let Some(error) = &admin.error {
        bail!("{error}");
    }
    print!("{}", render::mappings(&admin.mappings));
    Ok(())
}

fn set_mapping(config: &AppConfig, form: MappingForm) -> Result<()> {
    let mut session = session(config)?;
    session.run_quiet(Msg::UserMappingsRequested);
    if let Some(error) = &session.view().admin.error {
        bail!("{error}");
    }

    let steam_id = form.steam_id.trim().to_string();
    session.send(Msg::MappingSelected {
        steam_id: steam_id.clone(),
    });
    let action = session.view().admin.submit_label;
    session.send(Msg::MappingFormChanged(form));
    session.run_quiet(Msg::MappingSubmitted);

    let admin = session.view().admin;
    if let Some(error) = &admin.error {
        bail!("{error}");
    }
    println!("{action} {steam_id}: saved");
    print!("{}", render::mappings(&admin.mappings));
    Ok(())
}

fn update_games(config: &AppConfig, form: UpdateForm) -> Result<()> {
    let mut session = session(config)?;
    session.send(Msg::UpdateFormChanged(form));

    let mut stderr = std::io::stderr();
    session.run(Msg::UpdateSubmitted, |view| {
        let operation = &view.admin.operation;
        if matches!(
            operation.state,
            OperationPhaseLabel::Starting | OperationPhaseLabel::Running
        ) {
            let _ = write!(stderr, "\r{}", render::operation_line(operation));
            let _ = stderr.flush();
        }
    });
    eprintln!();

    let admin = session.view().admin;
    if let Some(error) = &admin.form_error {
        bail!("{error}");
    }
    print!("{}", render::operation_summary(&admin.operation));
    check_outcome(&admin.operation)
}

/// A run only succeeds when it completed and its result could be fetched.
fn check_outcome(operation: &OperationView) -> Result<()> {
    if operation.state == OperationPhaseLabel::Failed || operation.error.is_some() {
        bail!("update did not complete");
    }
    Ok(())
}

fn about(config: &AppConfig) -> Result<()> {
    let mut session = session(config)?;
    session.run_quiet(Msg::VersionRequested);

    let about = session.view().about;
    if let Some(error) = &about.error {
        bail!("{error}");
    }
    print!("{}", render::about(&about));
    Ok(())
}

fn auth_context(config: &AppConfig, source: Option<PathBuf>) -> AuthContext {
    let mut provider = ClaimsFileProvider::new(StateFile::new(config.identity_path()));
    if let Some(source) = source {
        provider = provider.with_source(source);
    }
    AuthContext::new(Arc::new(provider))
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start the auth runtime")?;
    Ok(runtime.block_on(future))
}

fn profile(config: &AppConfig) -> Result<()> {
    let mut auth = auth_context(config, None);
    let auth_state = block_on(async {
        auth.initialize().await;
        auth.state().clone()
    })?;
    let (state, _) = update(AppState::new(), Msg::AuthChanged(auth_state));

    let view = state.view();
    if let Some(prompt) = gate(GatedPage::Profile, &view.auth) {
        println!("{prompt}");
        return Ok(());
    }
    if let Some(user) = view.auth.user() {
        print!("{}", render::profile(user));
    }
    Ok(())
}

fn login(config: &AppConfig, claims: PathBuf) -> Result<()> {
    let mut auth = auth_context(config, Some(claims));
    let profile = block_on(auth.login())?.context("Login failed")?;
    println!("Signed in as {}", profile.username);
    Ok(())
}

fn logout(config: &AppConfig) -> Result<()> {
    let mut auth = auth_context(config, None);
    block_on(auth.logout())?.context("Logout failed")?;
    println!("Signed out");
    Ok(())
}

fn prefs(config: &AppConfig, command: PrefsCommand) -> Result<()> {
    let path = config.prefs_path();
    match command {
        PrefsCommand::Show => {
            print!("{}", render::preferences(&persistence::load_preferences(&path)));
        }
        PrefsCommand::Reset => {
            if persistence::reset_preferences(&path)? {
                println!("Preferences reset");
            } else {
                println!("No saved preferences");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_run_is_a_success() {
        let operation = OperationView {
            state: OperationPhaseLabel::Completed,
            progress: 100,
            ..OperationView::default()
        };
        assert!(check_outcome(&operation).is_ok());
    }

    #[test]
    fn missing_result_is_an_error() {
        let operation = OperationView {
            state: OperationPhaseLabel::Completed,
            progress: 100,
            error: Some("Failed to fetch result: expired".into()),
            ..OperationView::default()
        };
        assert!(check_outcome(&operation).is_err());
    }

    #[test]
    fn failed_run_is_an_error() {
        let operation = OperationView {
            state: OperationPhaseLabel::Failed,
            ..OperationView::default()
        };
        assert!(check_outcome(&operation).is_err());
    }
}
