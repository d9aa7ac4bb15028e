use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[a-z0-9_]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","ain","all","am","an","and","any","are","aren","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","couldn","couldn't",
            "d","did","didn","didn't","do","does","doesn","doesn't","doing","don","don't","down","during",
            "each","few","for","from","further",
            "had","hadn","hadn't","has","hasn","hasn't","have","haven","haven't","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","isn","isn't","it","it's","its","itself",
            "just","ll","m","ma","me","mightn","mightn't","more","most","mustn","mustn't","my","myself",
            "needn","needn't","no","nor","not","now","o","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "re","s","same","shan","shan't","she","she's","should","should've","shouldn","shouldn't","so","some","such",
            "t","than","that","that'll","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","wasn","wasn't","we","were","weren","weren't","what","when","where","which","while","who","whom","why","will","with","won","won't","wouldn","wouldn't",
            "y","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Case-insensitive stopword check.
pub fn is_stopword(token: &str) -> bool {
    if token.bytes().any(|b| b.is_ascii_uppercase()) {
        STOPWORDS.contains(token.to_ascii_lowercase().as_str())
    } else {
        STOPWORDS.contains(token)
    }
}

/// Lowercase `text` and split it into maximal runs of ASCII letters, digits and
/// underscores, keeping order and duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

pub fn filter_stopwords(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !is_stopword(t)).collect()
}

/// Tokenize and drop stopwords; the pipeline shared by indexing and querying.
pub fn analyze(text: &str) -> Vec<String> {
    filter_stopwords(tokenize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Hello, World! snake_case x2");
        assert_eq!(t, vec!["hello", "world", "snake_case", "x2"]);
    }

    #[test]
    fn stopword_list_size() {
        assert_eq!(STOPWORDS.len(), 179);
    }

    #[test]
    fn stopwords_ignore_case() {
        assert!(is_stopword("The"));
        assert!(is_stopword("the"));
        assert!(!is_stopword("cats"));
    }
}
