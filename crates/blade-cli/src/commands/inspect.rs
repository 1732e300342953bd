use blade_config::BladeConfig;
use blade_core::{BladeMsg, lang};

/// How the runtime would read one payload.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Inspection {
    pub raw: Option<String>,
    pub words: Vec<String>,
    pub question: bool,
    pub keywords_match: Option<bool>,
}

pub(super) fn inspect(msg: &BladeMsg, keywords: &[String]) -> Inspection {
    let keywords_match = if keywords.is_empty() {
        None
    } else {
        let refs: Vec<&str> = keywords.iter().map(String::as_str).collect();
        Some(lang::has_all_keywords(msg, &refs))
    };

    Inspection {
        raw: lang::raw(msg),
        words: lang::words(msg).unwrap_or_default(),
        question: lang::looks_like_question(msg),
        keywords_match,
    }
}

pub(super) fn cmd_inspect(config: &BladeConfig, text: &str, keywords: &[String]) {
    let msg = BladeMsg::new(config.blade.name.clone(), text);
    let report = inspect(&msg, keywords);

    println!("Raw:       {}", report.raw.as_deref().unwrap_or(""));
    println!("Words:     {}", report.words.join(" | "));
    println!("Question:  {}", if report.question { "yes" } else { "no" });
    if let Some(matched) = report.keywords_match {
        println!(
            "Keywords:  {} ({})",
            if matched { "all present" } else { "missing" },
            keywords.join(", ")
        );
    }
}
