//! Gemini response envelope.
//!
//! Every dispatched request produces exactly one [`Response`], serialized to
//! the Gemini wire format by [`Response::to_bytes`]. Status codes follow the
//! protocol: 20 success, 10 input, 30/31 redirect, 59 bad request.

/// The four mutually exclusive response shapes the gateway produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `20` with a `text/gemini` body.
    Success { body: String },
    /// `31` (permanent) or `30` (temporary) redirect to `url`.
    Redirect { url: String, permanent: bool },
    /// `10` input prompt; the client resubmits with its answer as the query.
    Input { prompt: String },
    /// `59` with a short diagnostic.
    BadRequest { message: String },
}

impl Response {
    /// Success response from ordered gemtext lines.
    pub fn page(lines: Vec<String>) -> Self {
        Response::Success {
            body: lines.join("\n"),
        }
    }

    /// Success response from an already assembled body (e.g. a landing page
    /// file read verbatim).
    pub fn raw(body: String) -> Self {
        Response::Success { body }
    }

    pub fn redirect(url: String, permanent: bool) -> Self {
        Response::Redirect { url, permanent }
    }

    pub fn input(prompt: &str) -> Self {
        Response::Input {
            prompt: prompt.to_string(),
        }
    }

    pub fn bad_request(message: String) -> Self {
        Response::BadRequest { message }
    }

    /// Serialize to the bytes sent to the client.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Response::Success { body } => format!("20 text/gemini\r\n{body}\n").into_bytes(),
            Response::Redirect { url, permanent } => {
                let code = if *permanent { 31 } else { 30 };
                format!("{code} {url}\r\n").into_bytes()
            }
            Response::Input { prompt } => format!("10 {prompt}\r\n").into_bytes(),
            Response::BadRequest { message } => format!("59 {message}\r\n").into_bytes(),
        }
    }
}
