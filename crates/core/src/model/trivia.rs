use url::Url;

/// A piece of trivia text, either prose or a clickable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaSegment {
    Text(String),
    Link(Url),
}

/// Split trivia into text and http(s) links, preserving all whitespace.
#[must_use]
pub fn split_trivia(trivia: &str) -> Vec<TriviaSegment> {
    let mut segments = Vec::new();
    let mut text = String::new();

    for piece in trivia.split_inclusive(char::is_whitespace) {
        let word = piece.trim_end_matches(char::is_whitespace);
        let trailing = &piece[word.len()..];
        match parse_link(word) {
            Some(url) => {
                if !text.is_empty() {
                    segments.push(TriviaSegment::Text(std::mem::take(&mut text)));
                }
                segments.push(TriviaSegment::Link(url));
                text.push_str(trailing);
            }
            None => text.push_str(piece),
        }
    }

    if !text.is_empty() {
        segments.push(TriviaSegment::Text(text));
    }
    segments
}

fn parse_link(word: &str) -> Option<Url> {
    if !(word.starts_with("http://") || word.starts_with("https://")) {
        return None;
    }
    Url::parse(word)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_trivia_is_one_segment() {
        let segments = split_trivia("Jamini means night.");
        assert_eq!(segments, vec![TriviaSegment::Text("Jamini means night.".into())]);
    }

    #[test]
    fn links_are_split_out() {
        let segments = split_trivia("See https://example.com/song for more");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], TriviaSegment::Text("See ".into()));
        assert!(matches!(&segments[1], TriviaSegment::Link(url) if url.host_str() == Some("example.com")));
        assert_eq!(segments[2], TriviaSegment::Text(" for more".into()));
    }
}
