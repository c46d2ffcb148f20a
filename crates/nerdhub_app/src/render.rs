use std::fmt::Write;

use chrono::{DateTime, NaiveDate};
use nerdhub_core::games::format_price;
use nerdhub_core::version::VersionStatus;
use nerdhub_core::{
    AboutView, GameDetailView, GamesView, MappingRow, OperationPhaseLabel, OperationView, Quote,
    QuotesView, UserProfile, ViewPreferences,
};

const BAR_WIDTH: usize = 30;

pub fn games(view: &GamesView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Showing {} of {} games",
        format_with_commas(view.rows.len() as u64),
        format_with_commas(view.total as u64)
    );
    if view.rows.is_empty() {
        return out;
    }

    let name_width = view
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, 48);
    let _ = writeln!(
        out,
        "{:>8}  {:<name_width$}  {:>12}  Owners",
        "AppID", "Name", "Price"
    );
    for row in &view.rows {
        let price = if row.discount > 0 {
            format!("{} -{}%", row.price, row.discount)
        } else {
            row.price.clone()
        };
        let _ = writeln!(
            out,
            "{:>8}  {:<name_width$}  {:>12}  {}",
            row.appid,
            truncate(&row.name, name_width),
            price,
            row.owners.join(", ")
        );
    }
    out
}

pub fn game_detail(view: &GameDetailView) -> String {
    let mut out = String::new();
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{notice}");
    }
    let Some(game) = &view.game else {
        return out;
    };

    let _ = writeln!(out, "{} ({})", game.name, game.appid);
    let price = match &game.price_overview {
        _ if game.is_free => "Free".to_string(),
        Some(price) if price.discount_percent > 0 => format!(
            "{} (was {}, -{}%)",
            format_price(price.final_price),
            format_price(price.initial),
            price.discount_percent
        ),
        Some(price) => format_price(price.final_price),
        None => "Unknown".to_string(),
    };
    let _ = writeln!(out, "Price: {price}");
    if let Some(release) = &game.release_date {
        let date = if release.coming_soon {
            "Coming soon".to_string()
        } else {
            release.date.clone()
        };
        let _ = writeln!(out, "Released: {date}");
    }
    list_line(&mut out, "Developers", &game.developers);
    list_line(&mut out, "Publishers", &game.publishers);
    let genres: Vec<String> = game.genres.iter().map(|g| g.description.clone()).collect();
    list_line(&mut out, "Genres", &genres);
    let categories: Vec<String> = game
        .categories
        .iter()
        .map(|c| c.description.clone())
        .collect();
    list_line(&mut out, "Categories", &categories);
    let _ = writeln!(out, "Owned by: {}", game.owner_count());
    if let Some(description) = &game.short_description {
        let _ = writeln!(out, "\n{description}");
    }
    out
}

fn list_line(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        let _ = writeln!(out, "{label}: {}", values.join(", "));
    }
}

pub fn quotes(view: &QuotesView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Showing {} of {} quotes",
        format_with_commas(view.rows.len() as u64),
        format_with_commas(view.total as u64)
    );
    for quote in &view.rows {
        let _ = writeln!(out, "\n[{}] {}", quote.id, self::quote(quote));
    }
    out
}

pub fn quote(quote: &Quote) -> String {
    let mut out = format!("\"{}\"\n    - {}", quote.text, quote.author);
    if let Some(date) = &quote.date {
        let _ = write!(out, ", {}", format_date(date));
    }
    if let Some(context) = quote.context.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(out, " ({context})");
    }
    out
}

pub fn mappings(rows: &[MappingRow]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("No user mappings\n");
    }
    for row in rows {
        let _ = writeln!(out, "{}", row.label);
    }
    out
}

/// One-line progress bar for an update run.
pub fn operation_line(view: &OperationView) -> String {
    let filled = usize::from(view.progress) * BAR_WIDTH / 100;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
    let mut line = format!("[{bar}] {:>3}%", view.progress);
    if !view.phase.is_empty() {
        let _ = write!(line, " {}", view.phase);
    }
    if !view.message.is_empty() {
        let _ = write!(line, ": {}", view.message);
    }
    line
}

pub fn operation_summary(view: &OperationView) -> String {
    let mut out = String::new();
    match view.state {
        OperationPhaseLabel::Completed => {
            let _ = writeln!(
                out,
                "Update {} completed",
                view.operation_id.as_deref().unwrap_or("?")
            );
        }
        OperationPhaseLabel::Failed => {
            out.push_str("Update failed\n");
        }
        OperationPhaseLabel::Idle
        | OperationPhaseLabel::Starting
        | OperationPhaseLabel::Running => {}
    }
    if let Some(result) = &view.result {
        let _ = writeln!(
            out,
            "Updated: {}  Skipped: {}  Failed: {}",
            format_with_commas(u64::from(result.updated)),
            format_with_commas(u64::from(result.skipped)),
            format_with_commas(u64::from(result.failed))
        );
        for (key, value) in &result.details {
            let _ = writeln!(out, "  {key}: {}", detail_value(value));
        }
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "{error}");
    }
    out
}

fn detail_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn about(view: &AboutView) -> String {
    let mut out = String::new();
    for row in &view.rows {
        let status = match &row.status {
            VersionStatus::Development => "development build".to_string(),
            VersionStatus::UpToDate => "up to date".to_string(),
            VersionStatus::UpdateAvailable(tag) => format!("{tag} available"),
            VersionStatus::Unknown => "unknown".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<10} running {:<16} latest {:<12} {}",
            row.component.label(),
            row.running.as_deref().unwrap_or("-"),
            row.latest.as_deref().unwrap_or("-"),
            status
        );
        if let Some(url) = &row.latest_url {
            let _ = writeln!(out, "           {url}");
        }
    }
    out
}

pub fn profile(user: &UserProfile) -> String {
    let full_name = format!("{} {}", user.first_name, user.last_name);
    let mut out = String::new();
    let _ = writeln!(out, "Username: {}", user.username);
    if !full_name.trim().is_empty() {
        let _ = writeln!(out, "Name:     {}", full_name.trim());
    }
    if !user.email.is_empty() {
        let _ = writeln!(out, "Email:    {}", user.email);
    }
    let _ = writeln!(out, "Avatar:   {}", user.avatar);
    out
}

pub fn preferences(prefs: &ViewPreferences) -> String {
    prefs
        .to_entries()
        .into_iter()
        .fold(String::new(), |mut out, (key, value)| {
            let _ = writeln!(out, "{key} = {value}");
            out
        })
}

/// Human date for ISO-8601 timestamps; anything unparseable is shown as is.
pub fn format_date(raw: &str) -> String {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%b %-d, %Y").to_string();
    }
    match NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
