//! Server-rendered map pages. Each page embeds its feature collection as a
//! JSON data island read by the map script.

use super::common::{local_now, map_service_error};
use crate::{
    errors::ApiError,
    geo::FeatureCollection,
    services::locator::{LocatedDetail, OpenFilter},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

/// Creates the router for the HTML pages
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/search/", get(search))
        .route("/stores/:id/", get(store_detail))
        .route("/branches/:id/", get(branch_detail))
        .route("/professionals/:id/", get(professional_detail))
}

#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    /// Case-insensitive substring of a store, branch or workshop name
    pub q: Option<String>,
    /// `true` keeps only places open now, `false` only closed ones
    pub abierto: Option<String>,
}

pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Html<String>, ApiError> {
    let open = OpenFilter::parse(query.abierto.as_deref()).map_err(map_service_error)?;
    let features = state
        .locator_service()
        .map_features(None, open, local_now(&state))
        .await
        .map_err(map_service_error)?;
    Ok(Html(render_map_page("Repuestos cerca de vos", "", &features)))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Html<String>, ApiError> {
    let open = OpenFilter::parse(query.abierto.as_deref()).map_err(map_service_error)?;
    let term = query.q.as_deref().unwrap_or("");
    let features = state
        .locator_service()
        .map_features(Some(term), open, local_now(&state))
        .await
        .map_err(map_service_error)?;
    Ok(Html(render_map_page("Resultados", term, &features)))
}

pub async fn store_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let detail = state
        .locator_service()
        .store_detail(id, local_now(&state))
        .await
        .map_err(map_service_error)?;
    Ok(Html(render_detail_page(&detail)))
}

pub async fn branch_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let detail = state
        .locator_service()
        .branch_detail(id, local_now(&state))
        .await
        .map_err(map_service_error)?;
    Ok(Html(render_detail_page(&detail)))
}

pub async fn professional_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let detail = state
        .locator_service()
        .professional_detail(id, local_now(&state))
        .await
        .map_err(map_service_error)?;
    Ok(Html(render_detail_page(&detail)))
}

// ---------------------------------------------------------------------------
// Rendering

const MAP_SCRIPT: &str = r#"
const data = JSON.parse(document.getElementById("features").textContent);
const map = L.map("map").setView([-25.2965, -57.6479], 12);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
const layer = L.geoJSON(data, {
  onEachFeature: (feature, marker) => {
    const p = feature.properties;
    const popup = document.createElement("div");
    const link = document.createElement("a");
    link.href = p.url;
    link.textContent = p.name;
    const status = document.createElement("span");
    status.textContent = p.status;
    popup.append(link, document.createElement("br"), status);
    marker.bindPopup(popup);
  }
}).addTo(map);
if (data.features.length > 0) {
  map.fitBounds(layer.getBounds(), { maxZoom: 15 });
}
"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes the collection for a `<script type="application/json">` block.
/// `<`, `>` and `&` are escaped so the data cannot close the script element.
pub fn feature_json(features: &FeatureCollection) -> String {
    serde_json::to_string(features)
        .unwrap_or_else(|_| r#"{"type":"FeatureCollection","features":[]}"#.to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn layout(title: &str, body: &str, features: &FeatureCollection) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<style>#map {{ height: 70vh; }}</style>
</head>
<body>
<header>
<a href="/">Inicio</a>
<form action="/search/" method="get">
<input type="search" name="q" placeholder="Buscar tienda, sucursal o taller">
<select name="abierto">
<option value="">Todos</option>
<option value="true">Abiertos ahora</option>
<option value="false">Cerrados</option>
</select>
<button type="submit">Buscar</button>
</form>
</header>
<main>
{body}
<div id="map"></div>
</main>
<script id="features" type="application/json">{data}</script>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script>{script}</script>
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
        data = feature_json(features),
        script = MAP_SCRIPT,
    )
}

pub fn render_map_page(title: &str, query: &str, features: &FeatureCollection) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(title));
    if !query.trim().is_empty() {
        body.push_str(&format!(
            "<p>Búsqueda: <strong>{}</strong></p>\n",
            escape_html(query.trim())
        ));
    }
    body.push_str(&format!("<p>{} resultados</p>\n<ul>\n", features.len()));
    for feature in &features.features {
        let p = &feature.properties;
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a> <span class=\"status\">{}</span></li>\n",
            escape_html(&p.url),
            escape_html(&p.name),
            escape_html(&p.status),
        ));
    }
    body.push_str("</ul>");
    layout(title, &body, features)
}

pub fn render_detail_page(detail: &LocatedDetail) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(&detail.name));
    if let Some(address) = &detail.address {
        body.push_str(&format!("<p class=\"address\">{}</p>\n", escape_html(address)));
    }
    body.push_str(&format!(
        "<p class=\"status\">{}</p>",
        escape_html(detail.status.label())
    ));
    layout(&detail.name, &body, &detail.features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Feature, FeatureKind, FeatureProperties, GeoPoint};
    use crate::hours::OpenStatus;

    fn collection(name: &str) -> FeatureCollection {
        FeatureCollection {
            features: vec![Feature {
                kind: "Feature".into(),
                geometry: GeoPoint::new(-57.6, -25.3),
                properties: FeatureProperties {
                    kind: FeatureKind::Store,
                    id: 1,
                    name: name.into(),
                    url: "/stores/1/".into(),
                    is_open: true,
                    status: "Abierto".into(),
                    address: None,
                },
            }],
            ..FeatureCollection::default()
        }
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn data_island_cannot_close_script() {
        let json = feature_json(&collection("</script><script>alert(1)"));
        assert!(!json.contains("</script>"));
        let back: FeatureCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back.features[0].properties.name, "</script><script>alert(1)");
    }

    #[test]
    fn map_page_lists_features() {
        let html = render_map_page("Resultados", "total", &collection("Repuestos Total"));
        assert!(html.contains(r#"<a href="/stores/1/">Repuestos Total</a>"#));
        assert!(html.contains("1 resultados"));
        assert!(html.contains(r#"<script id="features" type="application/json">"#));
    }

    #[test]
    fn hostile_names_stay_text_on_the_map() {
        let html = render_map_page("Mapa", "", &collection("<img src=x onerror=alert(1)>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        // Popups are assembled from text nodes, never from interpolated markup.
        assert!(html.contains("link.textContent = p.name;"));
        assert!(html.contains("status.textContent = p.status;"));
        assert!(!html.contains("${p.name}"));
        assert!(!html.contains("${p.status}"));
    }

    #[test]
    fn detail_page_shows_status() {
        let detail = LocatedDetail {
            kind: FeatureKind::Store,
            name: "Repuestos Total".into(),
            address: Some("Av. Mcal. López 1234".into()),
            status: OpenStatus::Closed,
            features: FeatureCollection::default(),
        };
        let html = render_detail_page(&detail);
        assert!(html.contains("Cerrado"));
        assert!(html.contains("Av. Mcal. López 1234"));
        assert!(html.contains(r#""features":[]"#));
    }
}
