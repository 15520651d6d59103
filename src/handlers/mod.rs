mod analysis;
mod chat;
mod health;
mod stream;

pub use analysis::{
    analysis_ai_handler, color_handler, mass_handler, ph_handler, velocity_handler,
};
pub use chat::{delete_chat_handler, get_chat_handler, start_session_handler};
pub use health::health_handler;
pub use stream::chat_stream_handler;
