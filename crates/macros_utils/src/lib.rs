//! Small declarative helpers shared by the HTTP apps.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub mod __private {
    pub use actix_web;
}

/// Generates a `pub fn routes(cfg: &mut ServiceConfig)` for a routes module.
///
/// Two forms are accepted. `route` registers handlers declared with the actix-web
/// attribute macros in the current module:
///
/// ```ignore
/// macros_utils::routes! {
///     route health_route,
/// }
/// ```
///
/// `load` declares child modules and chains their own `routes` functions:
///
/// ```ignore
/// macros_utils::routes! {
///     load health,
///     load checks,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($(load $module:ident),+ $(,)?) => {
        $(mod $module;)+

        pub fn routes(cfg: &mut $crate::__private::actix_web::web::ServiceConfig) {
            $($module::routes(cfg);)+
        }
    };
    ($(route $route:ident),+ $(,)?) => {
        pub fn routes(cfg: &mut $crate::__private::actix_web::web::ServiceConfig) {
            $(cfg.service($route);)+
        }
    };
}
