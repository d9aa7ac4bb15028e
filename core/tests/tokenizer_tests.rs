use docsearch_core::tokenizer::{analyze, filter_stopwords, tokenize};

#[test]
fn it_lowercases_and_splits_on_non_word_chars() {
    let toks = tokenize("Running, runner's RUN! The café's menu.");
    assert_eq!(toks, vec!["running", "runner", "s", "run", "the", "caf", "s", "menu"]);
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog");
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_keeps_order_and_duplicates() {
    assert_eq!(analyze("dog cat dog"), vec!["dog", "cat", "dog"]);
}

#[test]
fn filtering_is_idempotent() {
    let samples = [
        "I don't think it's THE end of the world, is it?",
        "a an the",
        "",
        "Rust 2021 edition: async/await and const_generics",
    ];
    for s in samples {
        let once = filter_stopwords(tokenize(s));
        let twice = filter_stopwords(once.clone());
        assert_eq!(once, twice, "{s}");
    }
}

#[test]
fn mixed_case_stopwords_are_removed() {
    let toks = vec!["The".to_string(), "Cats".to_string(), "AND".to_string()];
    assert_eq!(filter_stopwords(toks), vec!["Cats"]);
}
