#![windows_subsystem = "windows"]
slint::include_modules!();

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use github_repo_search::view::{CandidateRow, RepoRow, SearchView};
use github_repo_search::{logging, Dimensions, Layout, SearchFlow, ViewportTracker};
use slint::VecModel;
use tracing::{error, warn};

const NOTICE_DURATION: Duration = Duration::from_secs(4);

fn main() -> anyhow::Result<()> {
    // Loads .env first so RUST_LOG may be set there
    logging::init();

    // Background tokio runtime for async HTTP
    let rt = Arc::new(tokio::runtime::Runtime::new()?);

    // Create the UI
    let app = AppWindow::new()?;

    let flow = match SearchFlow::from_env() {
        Ok(flow) => Some(flow),
        Err(e) => {
            error!(error = %format!("{e:#}"), "configuration error, searching disabled");
            app.set_error_message(format!("Configuration error: {e:#}").into());
            app.set_can_search(false);
            None
        }
    };

    // =============================================
    //  VIEWPORT: window size → content width
    // =============================================
    let window = app.window();
    let size = window.size().to_logical(window.scale_factor());
    let tracker = ViewportTracker::with_initial(Dimensions::new(
        size.width.max(0.0) as u32,
        size.height.max(0.0) as u32,
    ));
    app.set_content_ratio(tracker.layout().content_ratio());

    let resize_subscription = {
        let app_weak = app.as_weak();
        tracker.subscribe(move |dims| {
            if let Some(app) = app_weak.upgrade() {
                app.set_content_ratio(Layout::for_width(dims.width).content_ratio());
            }
        })
    };

    {
        let tracker = tracker.clone();
        app.on_viewport_changed(move |width, height| {
            tracker.resize(Dimensions::new(
                width.max(0.0) as u32,
                height.max(0.0) as u32,
            ));
        });
    }

    // =============================================
    //  CALLBACK: search-requested
    // =============================================
    if let Some(flow) = flow {
        let app_weak = app.as_weak();
        let rt = rt.clone();

        app.on_search_requested(move |query| {
            let query = query.to_string();
            // Begun here and published on the UI thread, so the staleness
            // check is ordered against every later submission.
            let ticket = flow.begin();

            if let Some(app) = app_weak.upgrade() {
                app.set_is_searching(true);
                app.set_error_message("".into());
            }

            let flow = flow.clone();
            let app_weak = app_weak.clone();

            rt.spawn(async move {
                let outcome = flow.aggregate(&query).await;
                let view = SearchView::from(&outcome);

                let _ = slint::invoke_from_event_loop(move || {
                    flow.publish_if_current(&ticket, view, |view| {
                        if let Some(app) = app_weak.upgrade() {
                            publish(&app, view);
                        }
                    });
                });
            });
        });
    }

    // =============================================
    //  CALLBACK: repo-clicked
    // =============================================
    app.on_repo_clicked(|url| {
        if url.is_empty() {
            return;
        }
        // Open the repository page in the native web browser
        if let Err(e) = open::that(url.as_str()) {
            warn!(url = %url, error = %e, "failed to open repository in browser");
        }
    });

    // Run the Slint event loop
    app.run()?;

    resize_subscription.unsubscribe();
    Ok(())
}

/// Replaces the rendered result set with a completed search.
fn publish(app: &AppWindow, view: SearchView) {
    let items: Vec<CandidateItem> = view.candidates.into_iter().map(candidate_item).collect();

    app.set_candidate_list(Rc::new(VecModel::from(items)).into());
    app.set_heading(view.heading.into());
    app.set_error_message(view.error.unwrap_or_default().into());
    app.set_is_searching(false);

    if let Some(notice) = view.notice {
        show_notice(app, notice);
    }
}

fn candidate_item(row: CandidateRow) -> CandidateItem {
    let repos: Vec<RepoItem> = row.repos.into_iter().map(repo_item).collect();
    CandidateItem {
        login: row.login.into(),
        expanded: row.expanded,
        repos: Rc::new(VecModel::from(repos)).into(),
        status: row.status.into(),
        load_failed: row.load_failed,
    }
}

fn repo_item(row: RepoRow) -> RepoItem {
    RepoItem {
        name: row.name.into(),
        description: row.description.into(),
        stars: row.stars.into(),
        url: row.url.into(),
    }
}

/// Shows a toast that clears itself unless replaced in the meantime.
fn show_notice(app: &AppWindow, notice: String) {
    app.set_notice(notice.as_str().into());

    let app_weak = app.as_weak();
    slint::Timer::single_shot(NOTICE_DURATION, move || {
        if let Some(app) = app_weak.upgrade() {
            if app.get_notice().as_str() == notice {
                app.set_notice("".into());
            }
        }
    });
}
