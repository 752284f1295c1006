pub const LIVENESS_BODY: &str = "Organization monitor is running";

/// GET /
pub async fn index() -> &'static str {
    LIVENESS_BODY
}
