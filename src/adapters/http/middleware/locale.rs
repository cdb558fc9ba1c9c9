use actix_web::{
  Error, FromRequest, HttpMessage, HttpRequest,
  body::MessageBody,
  dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::{
  convert::Infallible,
  future::{Ready, ready},
  rc::Rc,
};

use crate::domain::portfolio::value_objects::Locale;

/// Header clients may use to pick a language explicitly
pub const LOCALE_HEADER: &str = "X-Locale";

/// Query parameter that overrides every header
const LOCALE_QUERY_PARAM: &str = "lang";

/// Locale middleware that resolves the language of each request
///
/// Sources, first match wins:
/// 1. `?lang=` query parameter
/// 2. `X-Locale` header
/// 3. `Accept-Language`, highest quality first
/// 4. The configured default
///
/// The result is stored in request extensions as [`RequestLocale`] and echoed
/// in the `Content-Language` response header.
///
/// # Example
///
/// ```no_run
/// use actix_web::App;
/// # use portfolio::adapters::http::middleware::locale::LocaleMiddleware;
/// # use portfolio::domain::portfolio::Locale;
///
/// let app = App::new()
///   .wrap(LocaleMiddleware::new(Locale::Es));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocaleMiddleware {
  default: Locale,
}

impl LocaleMiddleware {
  /// Creates a new locale middleware falling back to `default`
  pub fn new(default: Locale) -> Self {
    Self { default }
  }
}

impl<S, B> Transform<S, ServiceRequest> for LocaleMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = LocaleMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(LocaleMiddlewareService {
      service: Rc::new(service),
      default: self.default,
    }))
  }
}

pub struct LocaleMiddlewareService<S> {
  service: Rc<S>,
  default: Locale,
}

impl<S, B> Service<ServiceRequest> for LocaleMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let locale = resolve_locale(&req).unwrap_or(self.default);

    req.extensions_mut().insert(RequestLocale(locale));

    Box::pin(async move {
      let mut res = service.call(req).await?;

      // Error responses already carry the language they were rendered in
      if !res.headers().contains_key(CONTENT_LANGUAGE) {
        res
          .headers_mut()
          .insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale.code()));
      }

      Ok(res)
    })
  }
}

fn resolve_locale(req: &ServiceRequest) -> Option<Locale> {
  from_query(req.query_string())
    .or_else(|| {
      req
        .headers()
        .get(LOCALE_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(Locale::from_tag)
    })
    .or_else(|| {
      req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
        .and_then(from_accept_language)
    })
}

fn from_query(query: &str) -> Option<Locale> {
  query
    .split('&')
    .filter_map(|pair| pair.split_once('='))
    .find(|(key, _)| *key == LOCALE_QUERY_PARAM)
    .and_then(|(_, value)| Locale::from_tag(value))
}

/// Picks the supported language with the highest quality value
fn from_accept_language(header: &str) -> Option<Locale> {
  let mut candidates: Vec<(Locale, f32)> = header
    .split(',')
    .filter_map(|entry| {
      let mut parts = entry.split(';');
      let locale = Locale::from_tag(parts.next()?)?;
      let quality = parts
        .filter_map(|param| param.trim().strip_prefix("q="))
        .find_map(|q| q.trim().parse::<f32>().ok())
        .unwrap_or(1.0);
      (quality > 0.0).then_some((locale, quality))
    })
    .collect();

  // Stable, so equal weights keep header order
  candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
  candidates.first().map(|(locale, _)| *locale)
}

/// Locale resolved for the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
  pub fn locale(&self) -> Locale {
    self.0
  }
}

/// Handlers take `RequestLocale` as an argument. Without the middleware the
/// default locale is used.
impl FromRequest for RequestLocale {
  type Error = Infallible;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
    ready(Ok(req.locale()))
  }
}

/// Extension trait to read the resolved locale from a request
pub trait LocaleExt {
  fn locale(&self) -> RequestLocale;
}

impl LocaleExt for HttpRequest {
  fn locale(&self) -> RequestLocale {
    self
      .extensions()
      .get::<RequestLocale>()
      .copied()
      .unwrap_or_default()
  }
}

impl LocaleExt for ServiceRequest {
  fn locale(&self) -> RequestLocale {
    self
      .extensions()
      .get::<RequestLocale>()
      .copied()
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App, HttpResponse,
    test::{self, TestRequest},
    web,
  };

  async fn echo_locale(locale: RequestLocale) -> HttpResponse {
    HttpResponse::Ok().body(locale.locale().code())
  }

  #[test]
  fn test_accept_language_prefers_highest_quality() {
    assert_eq!(
      from_accept_language("fr-FR, es;q=0.5, en-US;q=0.8"),
      Some(Locale::En)
    );
    assert_eq!(from_accept_language("es-AR,en;q=0.9"), Some(Locale::Es));
    assert_eq!(from_accept_language("en;q=0, es;q=0.1"), Some(Locale::Es));
    assert_eq!(from_accept_language("de, fr;q=0.7, *"), None);
  }

  #[test]
  fn test_query_lang_parameter() {
    assert_eq!(from_query("featured=true&lang=en"), Some(Locale::En));
    assert_eq!(from_query("lang=pt"), None);
    assert_eq!(from_query(""), None);
  }

  #[actix_web::test]
  async fn test_locale_resolution_order() {
    let app = test::init_service(
      App::new()
        .wrap(LocaleMiddleware::new(Locale::Es))
        .route("/", web::get().to(echo_locale)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/?lang=en")
      .insert_header((LOCALE_HEADER, "es"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(CONTENT_LANGUAGE).unwrap(), "en");
    assert_eq!(test::read_body(resp).await, "en");

    let req = TestRequest::get()
      .uri("/")
      .insert_header((LOCALE_HEADER, "en-GB"))
      .insert_header((ACCEPT_LANGUAGE, "es"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(test::read_body(resp).await, "en");

    let req = TestRequest::get()
      .uri("/")
      .insert_header((ACCEPT_LANGUAGE, "en-US,en;q=0.9"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(test::read_body(resp).await, "en");
  }

  #[actix_web::test]
  async fn test_falls_back_to_configured_default() {
    let app = test::init_service(
      App::new()
        .wrap(LocaleMiddleware::new(Locale::En))
        .route("/", web::get().to(echo_locale)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/")
      .insert_header((ACCEPT_LANGUAGE, "de-DE"))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get(CONTENT_LANGUAGE).unwrap(), "en");
    assert_eq!(test::read_body(resp).await, "en");
  }

  #[actix_web::test]
  async fn test_extractor_without_middleware_uses_default() {
    let app = test::init_service(App::new().route("/", web::get().to(echo_locale))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(test::read_body(resp).await, "es");
  }
}
