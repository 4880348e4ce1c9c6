//! HTML pages and the browser search script.

use docdb_shared::escape_html;
use url::form_urlencoded;

/// A one-line notice shown above the landing page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Error(String),
    Message(String),
}

/// The landing page: upload form, search box and result area.
///
/// `pattern` pre-fills the search box; the script re-runs that search once
/// the socket is open.
pub fn landing_page(flash: Option<&Flash>, pattern: &str) -> String {
    let notice = match flash {
        Some(Flash::Error(text)) => {
            format!("<p class=\"flash error\">{}</p>", escape_html(text))
        }
        Some(Flash::Message(text)) => {
            format!("<p class=\"flash message\">{}</p>", escape_html(text))
        }
        None => String::new(),
    };

    layout(
        "DocDB",
        &format!(
            r#"{notice}
<h2>Upload</h2>
<form action="/upload" method="post" enctype="multipart/form-data">
  <input type="file" name="file">
  <input type="submit" value="Upload">
</form>
<h2>Search</h2>
<input type="text" id="search" autocomplete="off" value="{pattern}">
<p id="geoLoc"></p>
<div id="resultDiv"></div>
<script src="/assets/search.js"></script>"#,
            notice = notice,
            pattern = escape_html(pattern),
        ),
    )
}

/// Confirmation shown after a stored upload.
pub fn uploaded_page(file_name: &str) -> String {
    let href = escape_html(&format!("/files/{}", percent_encode(file_name)));
    let name = escape_html(file_name);
    layout(
        "DocDB - Uploaded",
        &format!(
            "<p>File <a href=\"{href}\">{name}</a> uploaded.</p>\n<p><a href=\"/\">Back</a></p>"
        ),
    )
}

/// A page reporting a failed request.
pub fn error_page(message: &str) -> String {
    layout(
        "DocDB - Error",
        &format!(
            "<p class=\"flash error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
            escape_html(message)
        ),
    )
}

/// Percent-encode every byte outside `A-Z a-z 0-9 - . _`.
///
/// The result is safe as a single URL path segment and as an RFC 5987
/// `value-chars` string.
pub(crate) fn percent_encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// The search script, connecting to `socket_url`.
///
/// Typing debounces for 250 ms before sending a search, pushes
/// `/Search/<text>` into history and replaces the result area with each
/// `result` frame. The browser position is sent as a `geolocation` request
/// and the answer shown above the results.
pub fn search_script(socket_url: &str) -> String {
    let url = serde_json::Value::String(socket_url.to_string()).to_string();
    format!(
        r#"(function () {{
  var socket = new WebSocket({url});
  var timer = 0;
  var search = document.getElementById("search");
  var results = document.getElementById("resultDiv");
  var place = document.getElementById("geoLoc");

  function send(frame) {{
    var text = JSON.stringify(frame);
    if (socket.readyState === WebSocket.OPEN) {{
      socket.send(text);
    }} else {{
      setTimeout(function () {{ send(frame); }}, 100);
    }}
  }}

  function searchRequest(limit) {{
    var text = search.value;
    window.history.pushState(text, "DocDB - Search", "/Search/" + encodeURIComponent(text));
    send({{ request: "search", pattern: text, limit: limit }});
  }}

  socket.onmessage = function (event) {{
    var data = JSON.parse(event.data);
    if (data.result != null) {{
      results.innerHTML = data.result;
    }} else if (data.location != null) {{
      place.textContent = data.location;
    }} else if (data.error != null) {{
      results.textContent = data.error;
    }}
  }};

  search.addEventListener("keyup", function () {{
    if (timer) clearTimeout(timer);
    timer = setTimeout(function () {{ searchRequest("false"); }}, 250);
  }});

  if (navigator.geolocation) {{
    navigator.geolocation.watchPosition(function (position) {{
      send({{
        request: "geolocation",
        lat: position.coords.latitude,
        lng: position.coords.longitude
      }});
    }});
  }}

  if (search.value !== "") {{
    searchRequest("false");
  }}
}})();
"#,
        url = url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_escapes_flash_and_pattern() {
        let flash = Flash::Error("<bad>".to_string());
        let page = landing_page(Some(&flash), "a\"b");

        assert!(page.contains("<p class=\"flash error\">&lt;bad&gt;</p>"));
        assert!(page.contains("value=\"a&quot;b\""));
        assert!(page.contains("action=\"/upload\""));
        assert!(page.contains("/assets/search.js"));
    }

    #[test]
    fn test_landing_page_without_flash() {
        let page = landing_page(None, "");
        assert!(!page.contains("flash"));
    }

    #[test]
    fn test_uploaded_page_links_encoded_name() {
        let page = uploaded_page("a#b?c d.txt");
        assert!(page.contains("<a href=\"/files/a%23b%3Fc%20d.txt\">a#b?c d.txt</a>"));

        let page = uploaded_page("<x>&y.txt");
        assert!(page.contains("href=\"/files/%3Cx%3E%26y.txt\""));
        assert!(page.contains(">&lt;x&gt;&amp;y.txt</a>"));
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("plain-name_1.txt"), "plain-name_1.txt");
        assert_eq!(percent_encode("a+b*c d"), "a%2Bb%2Ac%20d");
        assert_eq!(percent_encode("100%/x"), "100%25%2Fx");
        assert_eq!(percent_encode("żółw.txt"), "%C5%BC%C3%B3%C5%82w.txt");
    }

    #[test]
    fn test_search_script_embeds_socket_url() {
        let script = search_script("ws://localhost:9000/ws");
        assert!(script.contains("new WebSocket(\"ws://localhost:9000/ws\")"));
        assert!(script.contains("request: \"search\""));
        assert!(script.contains("request: \"geolocation\""));
    }
}
