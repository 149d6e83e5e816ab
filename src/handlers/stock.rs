//! Stock data endpoints
//!
//! - GET /stocks/{exchange}/{symbol} - quote, derived info and one year of history
//! - GET /stocks/{exchange}/{symbol}/financials.csv - financial table download

use actix_web::{http::header, web, HttpResponse, Result};

use crate::error::FetchError;
use crate::models::{ApiResponse, Exchange, StockResult};
use crate::services::export::{csv_file_name, financial_csv};
use crate::services::metrics::financial_metrics;
use crate::services::AppState;

fn bad_exchange(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
}

/// GET /api/v1/stocks/{exchange}/{symbol}
///
/// 200 with the valid result, 502 when every provider failed.
pub async fn get_stock(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (exchange, symbol) = path.into_inner();
    let exchange = match exchange.parse::<Exchange>() {
        Ok(exchange) => exchange,
        Err(message) => return Ok(bad_exchange(message)),
    };

    let result = state.stocks.get_stock_data(&symbol, exchange).await;
    if let Some(error) = result.error() {
        let response = ApiResponse::failure(error.to_string(), result);
        return Ok(HttpResponse::BadGateway().json(response));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// GET /api/v1/stocks/{exchange}/{symbol}/financials.csv
pub async fn download_financials(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (exchange, symbol) = path.into_inner();
    let exchange = match exchange.parse::<Exchange>() {
        Ok(exchange) => exchange,
        Err(message) => return Ok(bad_exchange(message)),
    };

    let data = match state.stocks.get_stock_data(&symbol, exchange).await {
        StockResult::Valid(data) => data,
        StockResult::Invalid { error } => {
            return Ok(HttpResponse::BadGateway().json(ApiResponse::<()>::error(error)));
        }
    };

    let rows = financial_metrics(&data.info);
    match financial_csv(&rows) {
        Ok(body) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", csv_file_name(&data.info.symbol)),
            ))
            .body(body)),
        Err(e) => {
            let err = FetchError::Unexpected(format!("{:#}", e));
            log::error!("csv export for {} failed: {}", data.info.symbol, err);
            let response = ApiResponse::<()>::error(format!("An error occurred: {}", err));
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("/{exchange}/{symbol}", web::get().to(get_stock))
            .route("/{exchange}/{symbol}/financials.csv", web::get().to(download_financials))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{reliance, state_with};
    use crate::models::MetricRow;
    use crate::services::quote_fetcher::tests::StubProvider;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn valid_stock_returns_result_payload() {
        let state = state_with(&[
            StubProvider::failing("yahoo_summary"),
            StubProvider::ok("yahoo_chart", reliance()),
        ]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/stocks/nse/reliance.ns").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["valid"], true);
        assert_eq!(body["data"]["exchange"], "NSE");
        assert_eq!(body["data"]["info"]["symbol"], "RELIANCE");
        assert_eq!(body["data"]["info"]["source"], "yahoo_chart");
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn exhausted_providers_return_bad_gateway() {
        let state = state_with(&[StubProvider::failing("a")]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/stocks/BSE/NOPE").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("BSE data error"));
        assert_eq!(body["data"]["valid"], false);
        assert_eq!(body["data"]["error"], body["message"]);
    }

    #[actix_web::test]
    async fn unknown_exchange_is_bad_request() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get().uri("/stocks/NYSE/IBM").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn csv_download_matches_financial_table() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/stocks/NSE/RELIANCE/financials.csv")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"RELIANCE_financial_data.csv\""
        );

        let body = test::read_body(resp).await;
        let rows: Vec<MetricRow> = csv::Reader::from_reader(&body[..])
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        let metrics: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.metric.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            metrics,
            [
                ("Revenue", "9.00T"),
                ("Gross Profit", "N/A"),
                ("Operating Margin", "12.34%"),
                ("Return on Equity", "N/A"),
                ("Debt to Equity", "N/A"),
                ("Current Ratio", "1.18"),
            ]
        );
    }
}
