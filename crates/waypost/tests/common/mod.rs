#![allow(dead_code)]

use std::path::PathBuf;

use waypost::{parse_body, Method, Request, Response, Router, UrlEncodedForm};

/// Absolute path of a directory under `tests/fixtures`.
pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

pub fn body(res: &Response) -> String {
    res.body_string()
        .unwrap_or_else(|| panic!("Body is not UTF-8: {:?}", res.body))
}

pub async fn get(router: &Router, raw_url: &str) -> Response {
    router.dispatch(Method::Get, raw_url).await
}

async fn page(_req: Request) -> Response {
    Response::html("test text")
}

/// The router most integration tests run against.
pub fn site() -> Router {
    let mut router = Router::new();

    router.add_route(["/", "about", "about/"], page).unwrap();
    router
        .add_route("/api/register/hedgehog/:id([a-z]+)", |req: Request| async move {
            let id = req.params.get("id").unwrap_or_default().to_string();
            Response::html(format!("{id} Hedgehog"))
        })
        .unwrap();
    router
        .add_asset_path("css", fixture("css"), false, "")
        .unwrap();
    router
        .add_route(":test([a-z]+)", |req: Request| async move {
            Response::html(req.params.get("test").unwrap_or_default().to_string())
        })
        .unwrap();
    router
        .add_route("/test/parse-data", |req: Request| async move {
            match parse_body(&UrlEncodedForm, &req).await {
                Some(Ok(form)) => Response::html(format!(
                    "Parse form data {}",
                    form.fields.get("test").unwrap_or_default()
                )),
                Some(Err(err)) => Response::new(415).body(err.to_string()),
                None => Response::html("No form data"),
            }
        })
        .unwrap();
    router
        .add_route("/another/test", |_req| async {
            Response::html("another test route")
        })
        .unwrap();
    router
        .add_route("/another/test/with/query-string", |req: Request| async move {
            Response::json(&req.query)
        })
        .unwrap();
    router
        .add_route("/README.md", |_req| async {
            Response::text("README.md content")
        })
        .unwrap();

    router.get("/test/get/method", page).unwrap();
    router.post("/test/post/method", page).unwrap();
    router.put("/test/put/method", page).unwrap();
    router.delete("/test/delete/method", page).unwrap();

    router
        .add_asset_path("images", fixture("images"), false, "")
        .unwrap();
    router.add_asset_path("js", fixture("js"), false, "").unwrap();

    router
}
