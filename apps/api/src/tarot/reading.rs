// Prompt text and the templated reading for the tarot service.

use crate::llm_client::prompts::{fill_template, join_sections, KOREAN_REPLY_INSTRUCTION};
use crate::tarot::deck::DrawnCard;

pub const HELP_MESSAGE: &str = r#"🔮 **타로 챗봇 사용법**

**명령어:**
- 일반적인 질문을 하면 선택한 수의 카드로 타로를 봐드립니다
- 카드 수를 1-3장 중에서 선택할 수 있습니다

**질문 예시:**
- "오늘 하루 어떻게 보낼까요?"
- "새로운 일을 시작하는 것에 대해 어떻게 생각하세요?"
- "연애운은 어떤가요?"
- "직장에서의 문제를 어떻게 해결해야 할까요?"

편안하게 질문해보세요! 🌟"#;

const READER_ROLE: &str = "당신은 전문적이고 통찰력 있는 타로 카드 리더입니다. \
    다음 질문에 대해 뽑힌 카드들을 바탕으로 심도 있는 타로 리딩을 제공해주세요.";

/// Reading prompt body. Replace: {question}, {cards}
const READING_PROMPT_TEMPLATE: &str = r#"**질문**: {question}

**뽑힌 카드들**:
{cards}

다음 구조로 답변해주세요:

1. **전체적인 메시지**: 카드들이 전달하는 핵심 메시지
2. **각 카드 해석**: 각 카드가 질문에 어떤 의미를 주는지 구체적 설명
3. **종합적인 조언**: 카드들을 종합하여 실용적인 조언 제공
4. **주의사항**: 앞으로 주의해야 할 점들"#;

const READING_TONE: &str = "따뜻하고 격려적인 톤으로 작성해주세요. \
    타로는 미래를 확정하는 것이 아닌 현재 상황을 통찰하고 가능성을 제시하는 도구임을 강조해주세요.";

/// `help` in any case, or `도움말`.
pub fn is_help_request(question: &str) -> bool {
    let question = question.trim();
    question.eq_ignore_ascii_case("help") || question == "도움말"
}

fn card_block(card: &DrawnCard) -> String {
    format!(
        "🃏 **{} ({})** - {}\n📝 설명: {}\n🔍 의미: {}",
        card.card.name,
        card.card.name_korean,
        card.orientation(),
        card.card.description,
        card.meaning()
    )
}

pub fn build_reading_prompt(question: &str, cards: &[DrawnCard]) -> String {
    let cards_info = cards.iter().map(card_block).collect::<Vec<_>>().join("\n\n");
    let body = fill_template(
        READING_PROMPT_TEMPLATE,
        &[("question", question), ("cards", cards_info.as_str())],
    );

    join_sections(&[READER_ROLE, &body, KOREAN_REPLY_INSTRUCTION, READING_TONE])
}

/// Reading assembled from the card meanings alone.
pub fn fallback_reading(question: &str, cards: &[DrawnCard]) -> String {
    let reversed = cards.iter().filter(|c| c.is_reversed).count();
    let overall = if reversed * 2 > cards.len() {
        "역방향 카드가 많이 나왔습니다. 지금은 서두르기보다 상황을 돌아보고 내면을 점검할 때입니다."
    } else {
        "정방향 카드가 중심을 이루고 있습니다. 흐름이 열려 있으니 차분히 한 걸음씩 나아가 보세요."
    };

    let drawn = cards
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} ({}) - {}",
                i + 1,
                c.card.name,
                c.card.name_korean,
                c.orientation()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let interpretations = cards
        .iter()
        .map(|c| {
            format!(
                "- **{}** ({}): {}",
                c.card.name_korean,
                c.orientation(),
                c.meaning()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let sections = [
        format!("🎴 **뽑힌 카드들**\n{drawn}"),
        format!("**질문**: {question}"),
        format!("## 1. 전체적인 메시지\n{overall}"),
        format!("## 2. 각 카드 해석\n{interpretations}"),
        "## 3. 종합적인 조언\n카드의 의미를 지금의 상황에 비추어 보고, 스스로 선택할 수 있는 부분에 집중해보세요."
            .to_string(),
        "## 4. 주의사항\n타로는 미래를 확정하지 않습니다. 현재를 돌아보고 가능성을 살피는 도구로 활용해주세요. 🌙"
            .to_string(),
    ];
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tarot::deck::TarotCard;

    fn drawn(name: &str, is_reversed: bool) -> DrawnCard {
        DrawnCard {
            card: TarotCard {
                name: name.to_string(),
                name_korean: format!("{name}-ko"),
                description: format!("{name} description"),
                upright_meaning: format!("{name} upright"),
                reversed_meaning: format!("{name} reversed"),
                local_image: None,
            },
            is_reversed,
        }
    }

    #[test]
    fn test_help_detection() {
        assert!(is_help_request("help"));
        assert!(is_help_request(" HELP "));
        assert!(is_help_request("도움말"));
        assert!(!is_help_request("help me"));
    }

    #[test]
    fn test_prompt_carries_orientation_and_meaning() {
        let cards = vec![drawn("The Sun", false), drawn("The Moon", true)];
        let prompt = build_reading_prompt("연애운은 어떤가요?", &cards);
        assert!(prompt.starts_with(READER_ROLE));
        assert!(prompt.contains("**질문**: 연애운은 어떤가요?"));
        assert!(prompt.contains("🃏 **The Sun (The Sun-ko)** - 정방향"));
        assert!(prompt.contains("🔍 의미: The Sun upright"));
        assert!(prompt.contains("🃏 **The Moon (The Moon-ko)** - 역방향"));
        assert!(prompt.contains("🔍 의미: The Moon reversed"));
        assert!(prompt.ends_with(READING_TONE));
    }

    #[test]
    fn test_question_braces_are_kept_verbatim() {
        let cards = vec![drawn("The Star", false)];
        let prompt = build_reading_prompt("{cards} 괜찮을까요?", &cards);
        assert!(prompt.contains("**질문**: {cards} 괜찮을까요?"));
        assert_eq!(prompt.matches("🃏 **The Star").count(), 1);
    }

    #[test]
    fn test_fallback_uses_card_meanings() {
        let cards = vec![drawn("Fool", true), drawn("Star", false)];
        let reading = fallback_reading("오늘 하루는?", &cards);
        assert!(reading.contains("1. Fool (Fool-ko) - 역방향"));
        assert!(reading.contains("2. Star (Star-ko) - 정방향"));
        assert!(reading.contains("- **Fool-ko** (역방향): Fool reversed"));
        assert!(reading.contains("- **Star-ko** (정방향): Star upright"));
        assert!(reading.contains("정방향 카드가 중심"));
    }

    #[test]
    fn test_fallback_overall_message_tracks_reversals() {
        let cards = vec![drawn("A", true), drawn("B", true), drawn("C", false)];
        assert!(fallback_reading("?", &cards).contains("역방향 카드가 많이"));
    }
}
