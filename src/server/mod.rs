// Server module entry point
// Listener creation, accept loop, connection serving and shutdown control

pub mod connection;
pub mod listener;
pub mod shutdown;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::Server;
pub use shutdown::ShutdownHandle;
pub use signal::start_signal_handler;
