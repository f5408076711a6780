use std::sync::LazyLock;

use jieba_rs::Jieba;

use crate::language::{Language, LanguageSpec};
use crate::lexicon;

/// Segmenter seeded with every Chinese lexicon entry as forced vocabulary,
/// so grammar words always come out whole.
static SEGMENTER: LazyLock<Jieba> = LazyLock::new(|| {
    let mut jieba = Jieba::new();
    for word in lexicon::chinese().lexicon.keys() {
        jieba.add_word(word, Some(1_000_000), None);
    }
    jieba
});

/// Split a sentence into lexicon-shaped tokens. Alphabetic languages are
/// whitespace-delimited; Chinese goes through the segmenter.
pub fn tokenize(sentence: &str, spec: &LanguageSpec) -> Vec<String> {
    match spec.language {
        Language::English | Language::Russian => sentence
            .split_whitespace()
            .map(str::to_string)
            .collect(),
        Language::Chinese => segment_chinese(sentence, spec),
    }
}

fn segment_chinese(sentence: &str, spec: &LanguageSpec) -> Vec<String> {
    let mut tokens = Vec::new();
    for segment in SEGMENTER.cut(sentence, false) {
        if segment.trim().is_empty() {
            continue;
        }
        if spec.lexicon.contains_key(segment) {
            tokens.push(segment.to_string());
        } else {
            // the segmenter may still merge adjacent grammar words it
            // knows as a compound (踢球); re-split against the lexicon
            longest_match_split(segment, spec, &mut tokens);
        }
    }
    tokens
}

/// Greedy longest-prefix split over the lexicon. Anything unmatched is
/// passed through untouched and surfaces upstream as a lexicon miss.
fn longest_match_split(segment: &str, spec: &LanguageSpec, out: &mut Vec<String>) {
    let mut rest = segment;
    while !rest.is_empty() {
        let hit = spec
            .lexicon
            .keys()
            .copied()
            .filter(|word| rest.starts_with(word))
            .max_by_key(|word| word.len());
        match hit {
            Some(word) => {
                out.push(word.to_string());
                rest = &rest[word.len()..];
            }
            None => {
                out.push(rest.to_string());
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_whitespace_split() {
        let spec = LanguageSpec::new(Language::English);
        assert_eq!(
            tokenize("cats chase mice", &spec),
            vec!["cats", "chase", "mice"]
        );
    }

    #[test]
    fn test_english_collapses_extra_whitespace() {
        let spec = LanguageSpec::new(Language::English);
        assert_eq!(tokenize("  dogs   are  bad ", &spec), vec!["dogs", "are", "bad"]);
    }

    #[test]
    fn test_russian_whitespace_split() {
        let spec = LanguageSpec::new(Language::Russian);
        assert_eq!(tokenize("kot vidit sobaku", &spec), vec!["kot", "vidit", "sobaku"]);
    }

    #[test]
    fn test_chinese_segments_to_lexicon_words() {
        let spec = LanguageSpec::new(Language::Chinese);
        assert_eq!(
            tokenize("你真温柔善良大度", &spec),
            vec!["你", "真", "温柔", "善良", "大度"]
        );
    }

    #[test]
    fn test_chinese_idiom_compound_resplit() {
        let spec = LanguageSpec::new(Language::Chinese);
        // 踢球 is a common compound; grammar needs verb and object apart
        assert_eq!(tokenize("我踢球", &spec), vec!["我", "踢", "球"]);
    }

    #[test]
    fn test_chinese_longer_sentence() {
        let spec = LanguageSpec::new(Language::Chinese);
        assert_eq!(
            tokenize("愚蠢的我愤怒地踢一颗硬邦邦的球", &spec),
            vec!["愚蠢的", "我", "愤怒地", "踢", "一颗", "硬邦邦的", "球"]
        );
    }

    #[test]
    fn test_unknown_text_passes_through() {
        let spec = LanguageSpec::new(Language::Chinese);
        let tokens = tokenize("我跳舞", &spec);
        assert_eq!(tokens[0], "我");
        assert!(tokens.iter().any(|t| !spec.lexicon.contains_key(t.as_str())));
    }

    #[test]
    fn test_longest_match_prefers_long_words() {
        let spec = LanguageSpec::new(Language::Chinese);
        let mut out = Vec::new();
        // 无可奈何地 must not decompose even though 无 alone is unknown
        longest_match_split("无可奈何地红温了", &spec, &mut out);
        assert_eq!(out, vec!["无可奈何地", "红温了"]);
    }
}
