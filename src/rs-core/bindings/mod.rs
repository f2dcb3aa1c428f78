mod backends;
pub(crate) mod formatters;
mod js_functions;

pub(crate) use backends::{
    JsBandwidthHint, JsClock, JsFetcher, JsLocalStorage, JsMediaEngine, JsViewSink,
};
pub use js_functions::*;
