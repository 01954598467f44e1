use tokio::net::TcpListener;
use tracing::{error, info};

mod database;
mod omni_error;
mod routes;
mod setup;
mod users;

#[tokio::main]
async fn main() {
    setup::read_environmental_variables();
    setup::initialise_logging();

    let state = setup::create_app_state().await;
    setup::promote_configured_founder(&state).await;

    let app = routes::app(state).layer(setup::cors_layer());

    let addr = setup::get_socket_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Error binding to {addr}: {e}");
            panic!();
        }
    };
    setup::report_listener_socket_addr(&listener);

    info!("Ready to serve.");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
    }
}
