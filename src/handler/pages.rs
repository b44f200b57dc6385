//! HTML pages
//!
//! Landing page, per-image download page and the error page. File names in
//! links are percent-encoded; every other interpolated value goes through
//! [`escape_html`].

use hyper::StatusCode;

use super::Resp;
use crate::http;
use crate::http::uri::encode_segment;

const STYLE: &str = r"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
            background: #f4f1ea;
            color: #2d2a26;
            min-height: 100vh;
            margin: 0;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            text-align: center;
            padding: 40px;
            background: #ffffff;
            border-radius: 16px;
            box-shadow: 0 8px 32px rgba(0, 0, 0, 0.12);
            max-width: 560px;
        }
        img { max-width: 100%; border-radius: 8px; }
        a.button {
            display: inline-block;
            margin-top: 20px;
            padding: 12px 28px;
            background: #2d6a4f;
            color: #ffffff;
            border-radius: 8px;
            text-decoration: none;
            font-weight: 600;
        }
";

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = escape_html(title),
    )
}

/// Landing page showing the QR code for the latest drawing
pub fn landing_page() -> String {
    layout(
        "Your drawing",
        r#"        <h1>Your drawing is ready</h1>
        <p>Scan the QR code with your phone to download it.</p>
        <img src="/qr" alt="QR code linking to your drawing" width="256" height="256">
        <p><a class="button" href="/">Show the newest drawing</a></p>"#,
    )
}

/// Page embedding one image with a download link
pub fn download_page(filename: &str) -> String {
    let image_url = format!("/download_image/{}", encode_segment(filename));
    let name = escape_html(filename);
    layout(
        "Download your drawing",
        &format!(
            r#"        <h1>Here is your drawing</h1>
        <img src="{image_url}" alt="{name}">
        <p><a class="button" href="{image_url}" download="{name}">Download</a></p>"#
        ),
    )
}

/// Error page with a short message
pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!(
            r#"        <h1>Sorry</h1>
        <p>{}</p>
        <p><a class="button" href="/">Back</a></p>"#,
            escape_html(message)
        ),
    )
}

/// Render [`error_page`] with a status code
pub fn error_response(message: &str, status: StatusCode, is_head: bool) -> Resp {
    http::build_html_response(error_page(message), status, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("desenho_12345.png"), "desenho_12345.png");
    }

    #[test]
    fn test_landing_page_embeds_qr() {
        let html = landing_page();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"src="/qr""#));
    }

    #[test]
    fn test_download_page_links_image() {
        let html = download_page("desenho_12345.png");
        assert!(html.contains(r#"src="/download_image/desenho_12345.png""#));
        assert!(html.contains(r#"download="desenho_12345.png""#));
    }

    #[test]
    fn test_download_page_escapes_name() {
        let html = download_page("<script>.png");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;.png"));
    }

    #[test]
    fn test_download_page_encodes_link() {
        let html = download_page("my art #1.png");
        assert!(html.contains(r#"src="/download_image/my%20art%20%231.png""#));
        assert!(html.contains(r#"download="my art #1.png""#));
    }

    #[test]
    fn test_error_page_message() {
        let html = error_page("File not found");
        assert!(html.contains("<p>File not found</p>"));
    }
}
