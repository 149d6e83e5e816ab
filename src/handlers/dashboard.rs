//! Dashboard page endpoint
//!
//! GET /dashboard?exchange=NSE&symbol=RELIANCE&mode=grid

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;

use crate::handlers::session::Session;
use crate::models::{normalize_symbol, ApiResponse, DashboardMode, Exchange};
use crate::services::dashboard::{build_dashboard, prompt};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// NSE or BSE, defaults to NSE
    pub exchange: Option<String>,
    pub symbol: Option<String>,
    pub mode: Option<DashboardMode>,
}

pub async fn get_dashboard(
    req: HttpRequest,
    query: web::Query<DashboardQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let exchange = match query.exchange.as_deref().map(str::parse::<Exchange>) {
        None => Exchange::default(),
        Some(Ok(exchange)) => exchange,
        Some(Err(message)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(message)));
        }
    };

    let symbol = normalize_symbol(query.symbol.as_deref().unwrap_or_default());
    if symbol.is_empty() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(prompt(exchange))));
    }

    let mode = query.mode.unwrap_or_default();
    let session = Session::from_request(&req);
    let layout = match mode {
        DashboardMode::Grid => state.layouts.load(&session.id).await,
        DashboardMode::Standard => Vec::new(),
    };

    let result = state.stocks.get_stock_data(&symbol, exchange).await;
    let view = build_dashboard(&symbol, exchange, mode, &result, &layout);

    let mut response = HttpResponse::Ok();
    if mode == DashboardMode::Grid {
        session.attach(&mut response);
    }
    Ok(response.json(ApiResponse::success(view)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::session::SESSION_COOKIE;
    use crate::handlers::test_support::{reliance, state_with};
    use crate::services::quote_fetcher::tests::StubProvider;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn blank_symbol_shows_prompt() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/dashboard?exchange=BSE&symbol=")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["state"], "prompt");
        assert_eq!(body["data"]["placeholder"], "TATAMOTORS");
    }

    #[actix_web::test]
    async fn failed_fetch_renders_error_banner() {
        let state = state_with(&[StubProvider::failing("a")]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/dashboard?symbol=nope").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["state"], "error");
        assert_eq!(body["data"]["exchange"], "NSE");
        assert_eq!(
            body["data"]["message"],
            "Error fetching data for NOPE. Please check the symbol and try again."
        );
    }

    #[actix_web::test]
    async fn grid_mode_issues_session_cookie_and_places_widgets() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/dashboard?exchange=NSE&symbol=RELIANCE&mode=grid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie should be set");
        assert!(!cookie.value().is_empty());
        assert_eq!(state.layouts.session_count().await, 0);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let widgets = body["data"]["widgets"].as_array().unwrap();
        assert_eq!(body["data"]["state"], "ready");
        assert_eq!(body["data"]["title"], "Indian Stock Market Analytics");
        assert_eq!(body["data"]["company"], "Reliance Industries Limited");
        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[0]["content"]["kind"], "price_chart");
        assert_eq!(widgets[0]["layout"]["width"], 12);
    }

    #[actix_web::test]
    async fn standard_mode_does_not_touch_sessions() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/dashboard?symbol=RELIANCE")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.response().cookies().next().is_none());
        assert_eq!(state.layouts.session_count().await, 0);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["mode"], "standard");
        assert!(body["data"]["widgets"][0]["layout"].is_null());
    }

    #[actix_web::test]
    async fn unknown_exchange_is_rejected() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/dashboard?exchange=LSE&symbol=X")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
