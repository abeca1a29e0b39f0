pub mod headless_renderer;
pub mod http_client;
pub mod pacer;

pub use headless_renderer::HeadlessChromeRenderer;
pub use http_client::ReqwestHttp;
pub use pacer::FixedDelayPacer;
