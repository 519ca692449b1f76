use crate::constants::CONTAINER_CLASS;

const STYLE: &str = "\
body{margin:0;background:#111;color:#eee;font-family:sans-serif}\
.ticker-wrap{overflow:hidden;white-space:nowrap;width:100%}\
.ticker{display:inline-block;animation:scroll 60s linear infinite}\
.stock{display:inline-block;padding:0 2rem}\
.logo{height:1em;vertical-align:middle;margin-right:.4em}\
.positive{color:#2ecc71}\
.negative{color:#e74c3c}\
@keyframes scroll{from{transform:translateX(0)}to{transform:translateX(-50%)}}";

/// Full HTML document with `markup` placed inside the ticker container.
///
/// The strip holds two identical copies, so translating by -50% lands on an
/// identical frame and the loop is seamless.
pub fn render_page(markup: &str, refresh_secs: Option<u64>) -> String {
    let refresh = refresh_secs
        .map(|secs| format!("<meta http-equiv=\"refresh\" content=\"{secs}\">"))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{refresh}\
         <title>Stock Ticker</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"ticker-wrap\"><div class=\"{CONTAINER_CLASS}\">{markup}</div></div>\n\
         </body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_wraps_markup_in_container() {
        let page = render_page("<div class='stock'>AAPL</div>", None);
        assert!(page.contains("<div class=\"ticker\"><div class='stock'>AAPL</div></div>"));
        assert!(!page.contains("http-equiv"));
    }

    #[test]
    fn page_can_reload_itself() {
        let page = render_page("", Some(5));
        assert!(page.contains("content=\"5\""));
    }
}
