//! Terminal donor search driven by the list controller.
//!
//! Reads commands from stdin and prints every settled page:
//! `set <key> <value>`, `clear <key>`, `district <name>`, `upazila <name>`,
//! `page <n>`, `show`, `quit`.

use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};

use donorlink::controller::{ListSnapshot, ListState};
use donorlink::domain::session::{AuthToken, Session, Theme};
use donorlink::domain::user::User;
use donorlink::dto::wire::UserWire;
use donorlink::location::LocationPicker;
use donorlink::models::config::ClientConfig;
use donorlink::pagination::PageView;
use donorlink::services::lists::{
    ListPage, open_list, select_district_filter, select_upazila_filter,
};
use donorlink::services::reference::load_reference_data;
use donorlink::source::ApiClient;

/// One aligned result row: blood group, name, district / upazila.
fn donor_line(donor: &User) -> String {
    let blood_group = donor.blood_group.map_or("?", |group| group.as_str());
    format!(
        "{:<4} {:<24} {} / {}",
        blood_group,
        donor.name.as_str(),
        donor.district.as_deref().unwrap_or("-"),
        donor.upazila.as_deref().unwrap_or("-"),
    )
}

fn print_snapshot(snapshot: &ListSnapshot<User>) {
    let view = PageView::from(&snapshot.result);
    println!(
        "-- page {} of {} ({} donors) --",
        view.page, snapshot.result.total_pages, view.total_count
    );
    for donor in view.items {
        println!("{}", donor_line(donor));
    }
    let pages: Vec<String> = view
        .pages
        .iter()
        .map(|page| match page {
            Some(number) if *number == view.page => format!("[{number}]"),
            Some(number) => number.to_string(),
            None => "…".to_string(),
        })
        .collect();
    if !pages.is_empty() {
        println!("{}", pages.join(" "));
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let config = match ClientConfig::load(&app_env) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            std::process::exit(1);
        }
    };

    let mut session = Session::anonymous(Theme::default());
    let mut api = match ApiClient::new(&config, &session) {
        Ok(api) => api,
        Err(err) => {
            log::error!("Failed to build HTTP client: {err}");
            std::process::exit(1);
        }
    };

    if let Some(token) = config.api_token.as_deref() {
        match AuthToken::new(token) {
            Ok(token) => {
                let authed = api.clone().with_token(token.clone());
                match authed.fetch_current_user().await {
                    Ok(user) => {
                        log::info!("Signed in as {}", user.email);
                        session.sign_in(user, token);
                        api = authed;
                    }
                    Err(err) => log::warn!("Continuing anonymously, token rejected: {err}"),
                }
            }
            Err(err) => log::warn!("Ignoring api_token: {err}"),
        }
    }

    let reference = load_reference_data(&api).await;
    if let Some(warning) = &reference.warning {
        eprintln!("warning: {warning}");
    }
    let mut picker = LocationPicker::new(reference.data);

    let page = ListPage::DonorSearch;
    let source = Arc::new(api.list::<UserWire>(page.endpoint()));
    let handle = match open_list::<User, _>(page, &session, source, &config) {
        Ok(handle) => handle,
        Err(err) => {
            log::error!("Cannot open donor search: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = handle.on_failure(|err| eprintln!("error: {err}")) {
        log::error!("{err}");
    }
    if let Err(err) = handle.set_page(1) {
        log::error!("{err}");
    }

    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.state == ListState::Settled {
                    print_snapshot(&snapshot);
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        log::error!("Failed to read stdin: {err}");
                        break;
                    }
                };
                let mut parts = line.trim().splitn(3, ' ');
                let result = match (parts.next(), parts.next(), parts.next()) {
                    (Some("set"), Some(key), value) => handle
                        .set_criterion(key, value.unwrap_or_default())
                        .map_err(|err| err.to_string()),
                    (Some("clear"), Some(key), None) => handle
                        .set_criterion(key, "")
                        .map_err(|err| err.to_string()),
                    (Some("district"), name, rest) => {
                        let name = [name.unwrap_or_default(), rest.unwrap_or_default()]
                            .join(" ");
                        select_district_filter(&handle, &mut picker, name.trim())
                            .map_err(|err| err.to_string())
                    }
                    (Some("upazila"), name, rest) => {
                        let name = [name.unwrap_or_default(), rest.unwrap_or_default()]
                            .join(" ");
                        select_upazila_filter(&handle, &mut picker, name.trim())
                            .map_err(|err| err.to_string())
                    }
                    (Some("page"), Some(number), None) => match number.parse() {
                        Ok(number) => handle.set_page(number).map_err(|err| err.to_string()),
                        Err(_) => Err(format!("not a page number: {number}")),
                    },
                    (Some("show"), None, None) => {
                        print_snapshot(&handle.get_snapshot());
                        Ok(())
                    }
                    (Some("quit"), None, None) => break,
                    (Some(""), None, None) => Ok(()),
                    _ => Err(format!("unknown command: {line}")),
                };
                if let Err(err) = result {
                    eprintln!("error: {err}");
                }
            }
        }
    }

    handle.dispose();
}
