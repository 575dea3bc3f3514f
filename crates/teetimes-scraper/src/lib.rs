pub mod error;
pub mod extract;
pub mod renderer;
mod retry;
pub mod url;
pub mod webdriver;

pub use error::RenderError;
pub use extract::{wait_for_time_slots, ExtractSettings, Extraction};
pub use renderer::{PageRenderer, RenderSession, RenderedDocument};
pub use url::facility_url;
pub use webdriver::{WebDriverConfig, WebDriverRenderer};
