#[cfg(feature = "ssr")]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    use actix_files::Files;
    use actix_web::*;
    use leptos::*;
    use leptos::logging::log;
    use leptos_actix::{generate_route_list, LeptosRoutes};
    use review_eval::app::*;
    use review_eval::api;
    use review_eval::catalog::ReviewCatalog;
    use review_eval::config::EvalConfig;
    use review_eval::session::SessionRegistry;
    use review_eval::store::CsvResultStore;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    // Load evaluation data; a broken data folder is fatal at startup only.
    let config = EvalConfig::load().map_err(std::io::Error::other)?;
    let catalog = ReviewCatalog::load(&config).map_err(std::io::Error::other)?;
    let catalog = Arc::new(catalog);
    let store = Arc::new(CsvResultStore::new(config.results_path()));
    let sessions = Arc::new(Mutex::new(SessionRegistry::default()));
    log!("Results will be appended to {}", store.path().display());

    // Load configuration
    let conf = get_configuration(None).await.map_err(std::io::Error::other)?;
    let addr = conf.leptos_options.site_addr;

    // Generate the list of routes in your Leptos App
    let routes = generate_route_list(App);
    log!("listening on http://{}", &addr);

    // Start the Actix Web server
    HttpServer::new(move || {
        let leptos_options = &conf.leptos_options;
        let site_root = &leptos_options.site_root;

        App::new()
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(sessions.clone()))
            // Register API routes BEFORE Leptos routes
            .configure(api::configure)
            // Serve JS/WASM/CSS from `pkg`
            .service(Files::new("/pkg", format!("{site_root}/pkg")))
            // Register Leptos routes
            .leptos_routes(leptos_options.to_owned(), routes.to_owned(), App)
            // Pass Leptos options to the app
            .app_data(web::Data::new(leptos_options.to_owned()))
    })
    .bind(&addr)?
    .run()
    .await
}

#[cfg(not(any(feature = "ssr", feature = "csr")))]
pub fn main() {
    // no client-side main function
    // unless we want this to work with e.g., Trunk for pure client-side testing
    // see lib.rs for hydration function instead
    // see optional feature `csr` instead
}

#[cfg(all(not(feature = "ssr"), feature = "csr"))]
pub fn main() {
    // a client-side main function is required for using `trunk serve`
    // prefer using `cargo leptos serve` instead
    // to run: `trunk serve --open --features csr`
    use review_eval::app::*;

    console_error_panic_hook::set_once();

    leptos::mount_to_body(App);
}
