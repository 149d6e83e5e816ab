//! Dashboard layout endpoints
//!
//! - GET /layout - current session layout
//! - PUT /layout - replace it after a drag or resize
//! - DELETE /layout - back to the default arrangement

use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::handlers::session::Session;
use crate::models::{ApiResponse, LayoutItem};
use crate::services::AppState;

pub async fn get_layout(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = Session::from_request(&req);
    let layout = state.layouts.load(&session.id).await;

    let mut response = HttpResponse::Ok();
    session.attach(&mut response);
    Ok(response.json(ApiResponse::success(layout)))
}

pub async fn save_layout(
    req: HttpRequest,
    body: web::Json<Vec<LayoutItem>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let session = Session::from_request(&req);

    match state.layouts.save(&session.id, body.into_inner()).await {
        Ok(layout) => {
            let mut response = HttpResponse::Ok();
            session.attach(&mut response);
            Ok(response.json(ApiResponse::success(layout)))
        }
        Err(e) => {
            let response = ApiResponse::<Vec<LayoutItem>>::error(e.to_string());
            Ok(HttpResponse::BadRequest().json(response))
        }
    }
}

pub async fn reset_layout(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = Session::from_request(&req);
    let layout = state.layouts.reset(&session.id).await;

    let mut response = HttpResponse::Ok();
    session.attach(&mut response);
    Ok(response.json(ApiResponse::success(layout)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/layout")
            .route(web::get().to(get_layout))
            .route(web::put().to(save_layout))
            .route(web::delete().to(reset_layout))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::session::SESSION_COOKIE;
    use crate::handlers::test_support::{reliance, state_with};
    use crate::models::default_layout;
    use crate::services::quote_fetcher::tests::StubProvider;
    use actix_web::cookie::Cookie;
    use actix_web::{http::StatusCode, test, App};

    fn session_cookie() -> Cookie<'static> {
        Cookie::new(SESSION_COOKIE, "session-a")
    }

    #[actix_web::test]
    async fn new_session_gets_default_layout_and_cookie() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/layout").to_request()).await;
        assert!(resp
            .response()
            .cookies()
            .any(|c| c.name() == SESSION_COOKIE));

        let body: ApiResponse<Vec<LayoutItem>> = test::read_body_json(resp).await;
        assert_eq!(body.data.unwrap(), default_layout());
    }

    #[actix_web::test]
    async fn cookieless_reads_do_not_accumulate_sessions() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        for _ in 0..50 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/layout").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let resp = test::call_service(&app, test::TestRequest::delete().uri("/layout").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.layouts.session_count().await, 0);
    }

    #[actix_web::test]
    async fn saved_layout_is_returned_for_same_session() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state).configure(config)).await;

        let mut moved = default_layout();
        moved[1].y = 5;
        moved[2].y = 5;
        let req = test::TestRequest::put()
            .uri("/layout")
            .cookie(session_cookie())
            .set_json(&moved)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.response().cookies().next().is_none());

        let req = test::TestRequest::get()
            .uri("/layout")
            .cookie(session_cookie())
            .to_request();
        let body: ApiResponse<Vec<LayoutItem>> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.data.unwrap(), moved);

        let req = test::TestRequest::delete()
            .uri("/layout")
            .cookie(session_cookie())
            .to_request();
        let body: ApiResponse<Vec<LayoutItem>> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.data.unwrap(), default_layout());
    }

    #[actix_web::test]
    async fn invalid_layout_is_rejected() {
        let state = state_with(&[StubProvider::ok("a", reliance())]);
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let mut bad = default_layout();
        bad[0].width = 0;
        let req = test::TestRequest::put()
            .uri("/layout")
            .cookie(session_cookie())
            .set_json(&bad)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.layouts.load("session-a").await, default_layout());
    }
}
