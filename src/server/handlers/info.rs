use super::SharedDirectory;
use crate::directory::DirectoryInfo;
use crate::server::structured_error::ApiError;
use axum::extract::State;
use axum::response::Html;
use axum::Json;

pub async fn info_page(State(directory): State<SharedDirectory>) -> Result<Html<String>, ApiError> {
    let info = directory.info().await?;
    Ok(Html(render_info(&info)))
}

pub async fn info_json(
    State(directory): State<SharedDirectory>,
) -> Result<Json<DirectoryInfo>, ApiError> {
    Ok(Json(directory.info().await?))
}

fn render_info(info: &DirectoryInfo) -> String {
    format!(
        "<p>Phonebook has info for {} people</p>\n<p>{}</p>\n",
        info.count, info.generated_at
    )
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    #[test]
    fn test_render_info_mentions_count_and_time() {
        let html = render_info(&DirectoryInfo {
            count: 4,
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        });
        assert!(html.contains("Phonebook has info for 4 people"));
        assert!(html.contains("<p>2024-01-01T00:00:00Z</p>"));
    }
}
