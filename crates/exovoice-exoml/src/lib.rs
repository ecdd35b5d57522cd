//! ExoML rendering for Exotel call-control responses.
//!
//! Two documents exist: one that speaks a prompt and records the caller's
//! next utterance, and one that speaks a message and hangs up. The layout is
//! fixed and must stay byte-for-byte stable for the carrier.
//!
//! All interpolated text is XML-escaped. Prompts echo transcribed caller
//! speech, so unescaped `<` or `&` would otherwise produce a malformed
//! document.

use exovoice_types::TurnOutcome;

/// Content type for rendered documents.
pub const APPLICATION_XML: &str = "application/xml";

/// Path the carrier posts the next recording to, relative to the callback base.
pub const NEXT_PATH: &str = "/exotel/next";

/// Maximum recording length in seconds.
pub const RECORD_MAX_LENGTH_SECS: u32 = 5;

/// Silence in seconds after which recording stops.
pub const RECORD_TIMEOUT_SECS: u32 = 4;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Escapes XML special characters in text content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Builds the URL the carrier should post the next recording to.
pub fn next_action_url(callback_base: &str) -> String {
    format!("{}{}", callback_base.trim_end_matches('/'), NEXT_PATH)
}

/// Renders a document that speaks `prompt` and records the next utterance.
pub fn say_record(prompt: &str, callback_base: &str) -> String {
    format!(
        "{XML_DECLARATION}\n<Response>\n  <Say>{}</Say>\n  <Record action=\"{}\" method=\"POST\" maxLength=\"{RECORD_MAX_LENGTH_SECS}\" timeout=\"{RECORD_TIMEOUT_SECS}\" playBeep=\"true\"/>\n</Response>",
        escape_xml(prompt),
        escape_xml(&next_action_url(callback_base)),
    )
}

/// Renders a document that speaks `message` and hangs up.
pub fn say_hangup(message: &str) -> String {
    format!(
        "{XML_DECLARATION}\n<Response>\n  <Say>{}</Say>\n  <Hangup/>\n</Response>",
        escape_xml(message),
    )
}

/// Renders the document for a turn outcome.
pub fn render(outcome: &TurnOutcome, callback_base: &str) -> String {
    match outcome {
        TurnOutcome::Continue { prompt } => say_record(prompt, callback_base),
        TurnOutcome::End { message } => say_hangup(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exovoice_types::GREETING;

    #[test]
    fn say_record_matches_carrier_layout() {
        let doc = say_record(GREETING, "https://voice.example.com");
        assert_eq!(
            doc,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Response>\n  \
             <Say>Hello! How can I help you today?</Say>\n  \
             <Record action=\"https://voice.example.com/exotel/next\" method=\"POST\" maxLength=\"5\" timeout=\"4\" playBeep=\"true\"/>\n\
             </Response>"
        );
    }

    #[test]
    fn say_hangup_matches_carrier_layout() {
        let doc = say_hangup("Goodbye.");
        assert_eq!(
            doc,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Response>\n  \
             <Say>Goodbye.</Say>\n  \
             <Hangup/>\n\
             </Response>"
        );
    }

    #[test]
    fn continue_has_one_say_and_one_record() {
        let doc = render(
            &TurnOutcome::Continue {
                prompt: "Anything else?".to_string(),
            },
            "http://localhost:8000",
        );
        assert_eq!(doc.matches("<Say>").count(), 1);
        assert_eq!(doc.matches("<Record ").count(), 1);
        assert!(doc.contains(r#"maxLength="5""#));
        assert!(doc.contains(r#"timeout="4""#));
        assert!(doc.contains(r#"playBeep="true""#));
        assert!(!doc.contains("<Hangup/>"));
    }

    #[test]
    fn end_has_one_say_and_one_hangup() {
        let doc = render(&TurnOutcome::apology(), "http://localhost:8000");
        assert_eq!(doc.matches("<Say>").count(), 1);
        assert_eq!(doc.matches("<Hangup/>").count(), 1);
        assert!(!doc.contains("<Record"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let outcome = TurnOutcome::Continue {
            prompt: "You said: hi. Anything else?".to_string(),
        };
        assert_eq!(render(&outcome, "http://a"), render(&outcome, "http://a"));
    }

    #[test]
    fn caller_text_is_escaped() {
        let doc = say_hangup("You said: <Hangup/> & \"bye\". Goodbye.");
        assert!(doc.contains(
            "<Say>You said: &lt;Hangup/&gt; &amp; &quot;bye&quot;. Goodbye.</Say>"
        ));
        assert_eq!(doc.matches("<Hangup/>").count(), 1);
    }

    #[test]
    fn callback_base_is_escaped_and_trimmed() {
        let doc = say_record("hi", "https://example.com/hooks/?a=1&b=2/");
        assert!(doc.contains(r#"action="https://example.com/hooks/?a=1&amp;b=2/exotel/next""#));

        assert_eq!(next_action_url("http://x/"), "http://x/exotel/next");
        assert_eq!(next_action_url(""), "/exotel/next");
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_xml("what is your return policy"), "what is your return policy");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }
}
