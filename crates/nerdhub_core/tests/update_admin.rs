use std::collections::BTreeMap;

use nerdhub_core::version::{Component, VersionStatus};
use nerdhub_core::{
    update, AppState, AuthState, Effect, GameSortField, MappingForm, Msg, SortDirection,
    UserMapping, VersionInfo, ViewPreferences,
};
use pretty_assertions::assert_eq;

fn mapping(steam_id: &str, username: &str, nickname: Option<&str>) -> UserMapping {
    UserMapping {
        steam_id: steam_id.to_string(),
        username: username.to_string(),
        nickname: nickname.map(str::to_string),
    }
}

fn with_mappings() -> AppState {
    let (state, effects) = update(AppState::new(), Msg::UserMappingsRequested);
    assert_eq!(effects, vec![Effect::LoadUserMappings]);
    let (state, _) = update(
        state,
        Msg::UserMappingsLoaded(Ok(vec![
            mapping("1", "gaben", Some("Gabe")),
            mapping("2", "robin", None),
        ])),
    );
    state
}

#[test]
fn selecting_a_mapping_prefills_the_form() {
    let state = with_mappings();
    let (state, _) = update(state, Msg::MappingSelected { steam_id: "1".into() });

    let view = state.view().admin;
    assert_eq!(
        view.mapping_form,
        MappingForm {
            steam_id: "1".into(),
            username: "gaben".into(),
            nickname: "Gabe".into(),
        }
    );
    assert_eq!(view.submit_label, "Update User");
    assert_eq!(view.mappings[1].label, "robin (2)");

    let (state, _) = update(state, Msg::MappingCleared);
    let view = state.view().admin;
    assert_eq!(view.mapping_form, MappingForm::default());
    assert_eq!(view.submit_label, "Add User");
}

#[test]
fn saving_a_mapping_reloads_the_list() {
    let state = with_mappings();
    let (state, _) = update(
        state,
        Msg::MappingFormChanged(MappingForm {
            steam_id: "3".into(),
            username: "newbie".into(),
            nickname: String::new(),
        }),
    );
    let (state, effects) = update(state, Msg::MappingSubmitted);
    assert_eq!(
        effects,
        vec![Effect::SaveUserMapping {
            mapping: mapping("3", "newbie", None)
        }]
    );
    assert!(state.is_busy());

    let (state, effects) = update(state, Msg::MappingSaved(Ok(())));
    assert_eq!(effects, vec![Effect::LoadUserMappings]);
    assert_eq!(state.mapping_form(), &MappingForm::default());
}

#[test]
fn incomplete_mapping_is_not_sent() {
    let (state, effects) = update(AppState::new(), Msg::MappingSubmitted);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().admin.error.as_deref(),
        Some("Steam ID is required")
    );
}

#[test]
fn failed_save_keeps_the_form() {
    let form = MappingForm {
        steam_id: "3".into(),
        username: "newbie".into(),
        nickname: "N".into(),
    };
    let (state, _) = update(AppState::new(), Msg::MappingFormChanged(form.clone()));
    let (state, _) = update(state, Msg::MappingSubmitted);
    let (state, effects) = update(state, Msg::MappingSaved(Err("400 Bad Request".into())));

    assert!(effects.is_empty());
    assert_eq!(state.mapping_form(), &form);
    assert_eq!(
        state.view().admin.error.as_deref(),
        Some("Failed to update user mapping: 400 Bad Request")
    );
}

#[test]
fn version_rows_compare_against_latest_tags() {
    let state = AppState::new().with_client_version("v2.0.0");
    let (state, effects) = update(state, Msg::VersionRequested);
    assert_eq!(effects, vec![Effect::LoadVersion]);

    let (state, _) = update(
        state,
        Msg::VersionLoaded(Ok(VersionInfo {
            backend_version: Some("dev-prerelease".into()),
            latest_backend_git_tag: Some("v1.4.0".into()),
            latest_frontend_git_tag: Some("v2.1.0".into()),
            latest_discord_git_tag: Some("v0.9.0".into()),
        })),
    );

    let rows = state.view().about.rows;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].component, Component::Frontend);
    assert_eq!(
        rows[0].status,
        VersionStatus::UpdateAvailable("v2.1.0".into())
    );
    assert_eq!(rows[1].status, VersionStatus::Development);
    assert_eq!(
        rows[2].latest_url.as_deref(),
        Some("https://github.com/TheNerdsHub/NerdHub-Discord/releases/tag/v0.9.0")
    );
}

#[test]
fn version_error_uses_fixed_message() {
    let (state, _) = update(AppState::new(), Msg::VersionRequested);
    let (state, _) = update(state, Msg::VersionLoaded(Err("timeout".into())));
    let about = state.view().about;
    assert!(about.rows.is_empty());
    assert_eq!(
        about.error.as_deref(),
        Some("Error fetching backend version and git tags.")
    );
}

#[test]
fn preferences_survive_named_keys() {
    let mut entries = BTreeMap::new();
    entries.insert("games.sortField".to_string(), "owners".to_string());
    entries.insert("games.sortDirection".to_string(), "desc".to_string());
    entries.insert("games.onSaleOnly".to_string(), "true".to_string());
    entries.insert("quotes.sortField".to_string(), "garbage".to_string());

    let prefs = ViewPreferences::from_entries(&entries);
    assert_eq!(prefs.games_sort.field, GameSortField::OwnerCount);
    assert_eq!(prefs.games_sort.direction, SortDirection::Descending);
    assert!(prefs.games_on_sale_only);
    assert!(!prefs.games_free_only);
    // Malformed values fall back to defaults.
    assert_eq!(prefs.quotes_sort, ViewPreferences::default().quotes_sort);

    let (state, _) = update(AppState::new(), Msg::PreferencesRestored(prefs));
    assert_eq!(state.preferences(), prefs);
    assert_eq!(
        ViewPreferences::from_entries(&state.preferences().to_entries()),
        prefs
    );
}

#[test]
fn auth_changes_are_reflected_in_view() {
    let (state, _) = update(AppState::new(), Msg::AuthChanged(AuthState::Anonymous));
    assert!(!state.view().auth.is_authenticated());
}
