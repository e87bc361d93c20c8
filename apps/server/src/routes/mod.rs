use actix_cors::Cors;

macros_utils::routes! {
    load health,
    load checks,
    load reports,
}

/// Any origin, method and header may call the API.
pub fn cors() -> Cors {
    Cors::permissive()
}
