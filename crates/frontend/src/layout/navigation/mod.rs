//! Navigation System - переключение секций и под-вкладок.
//!
//! Содержит:
//! - `system` - `NavigationSystem`: допуск, видимость, загрузка, кэш, история
//! - `handlers` - цепочка обработчиков навигации (совместимость со старыми слоями)
//! - `loaders` - реестр загрузчиков по соглашению `load<Section>`
//! - `click` - разбор текста inline-обработчиков ссылок сайдбара

pub mod click;
pub mod handlers;
pub mod loaders;
pub mod system;

pub use click::parse_section_handler;
pub use handlers::{legacy_callback, HandlerChain, HandlerError, NavigationHandler, Next};
pub use loaders::{
    js_error_message, window_loader, LoadError, LoadFuture, Loader, LoaderRegistry, LoaderResolver,
};
pub use system::{LoadOutcome, NavigationOutcome, NavigationSystem};
