use actix_web::{http::header, route, web, HttpResponse, Responder};
use clap::Parser;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

pub mod assistant;
pub mod category;
pub mod client;
pub mod clova;
pub mod custom_date;
pub mod error;
pub mod feed;

use assistant::Assistant;
use category::FeedResolver;
use client::{FeedClient, HATENA_BASE_URL};
use clova::{RequestMessage, ResponseMessage};

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Args {
    #[clap(short, long, default_value = "127.0.0.1")]
    pub ip: String,

    #[clap(short, long, default_value = "3000")]
    pub port: u16,

    /// Host the hot entry feeds are fetched from
    #[clap(short, long, default_value = HATENA_BASE_URL)]
    pub base_url: String,

    /// Seconds a feed fetch may take before the request falls back
    #[clap(short, long, default_value = "5")]
    pub timeout: NonZeroU64,

    /// Only answer requests addressed to this extension
    #[clap(short, long, env = "EXTENSION_ID")]
    pub extension_id: Option<String>,
}

pub struct AppState {
    pub assistant: Assistant<reqwest::Client>,
}

impl AppState {
    pub fn from_args(args: Args) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(args.timeout.get());
        let http = reqwest::Client::builder().connect_timeout(timeout).build()?;
        let client = FeedClient::new(http, Arc::new(FeedResolver::hatena()))
            .with_base_url(args.base_url)
            .with_timeout(timeout);
        let assistant = Assistant::new(client).with_extension_id(args.extension_id);

        Ok(Self { assistant })
    }
}

#[route("/callback", method = "POST")]
pub async fn callback(body: web::Bytes, app_data: web::Data<AppState>) -> impl Responder {
    let message: RequestMessage = match serde_json::from_slice(&body) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Failed to parse CEK request");
            return HttpResponse::BadRequest().body("Failed to parse request");
        }
    };

    match app_data.assistant.respond(&message).await {
        Ok(response) => create_response(&response),
        Err(e) => {
            error!(error = %e, "Failed to answer CEK request");
            internal_error()
        }
    }
}

fn create_response(message: &ResponseMessage) -> HttpResponse {
    match serde_json::to_string(message) {
        Ok(body) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "application/json;charset=UTF-8"))
            .body(body),
        Err(e) => {
            error!(error = %e, "Failed to encode CEK response");
            internal_error()
        }
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .body("Internal Server Error")
}
