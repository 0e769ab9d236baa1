//! HTTP/1 listener that feeds requests into a [`Router`].

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderName, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use waypost::{Method, Request, Response, Router};

/// Accepts connections until `shutdown` resolves.
///
/// Each connection is served on its own task. Connections still open when
/// `shutdown` fires run to completion.
pub async fn listen<F>(listener: TcpListener, router: Arc<Router>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutting down listener");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        warn!(error = %err, "Failed to accept connection");
                        continue;
                    }
                };
                debug!(%peer, "Accepted connection");

                let io = TokioIo::new(stream);
                let router = Arc::clone(&router);
                tokio::task::spawn(async move {
                    let service = service_fn(move |req| {
                        let router = Arc::clone(&router);
                        handle_request(req, router)
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        warn!(%peer, error = %err, "Error serving connection");
                    }
                });
            }
        }
    }
}

async fn handle_request(
    req: HyperRequest<Incoming>,
    router: Arc<Router>,
) -> Result<HyperResponse<Full<Bytes>>, Infallible> {
    let Some(method) = Method::parse(req.method().as_str()) else {
        debug!(method = %req.method(), "Unsupported method");
        return Ok(into_hyper(Response::new(501).body("Not Implemented")));
    };

    let raw_url = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let mut request = Request::new(method, raw_url);

    for (key, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.insert(key.to_string(), v.to_string());
        }
    }

    match req.collect().await {
        Ok(body) => request.body = body.to_bytes().to_vec(),
        Err(err) => {
            warn!(error = %err, "Failed to read request body");
            return Ok(into_hyper(Response::new(400).body("Bad Request")));
        }
    }

    Ok(into_hyper(router.handle(request).await))
}

fn into_hyper(response: Response) -> HyperResponse<Full<Bytes>> {
    let mut out = HyperResponse::new(Full::new(Bytes::from(response.body)));
    *out.status_mut() =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    for (key, value) in response.headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                out.headers_mut().insert(name, value);
            }
            _ => warn!(header = %key, "Dropping invalid response header"),
        }
    }

    out
}
