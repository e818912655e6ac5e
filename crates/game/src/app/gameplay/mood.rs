#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Dead,
    Angry,
    Hurt,
    Sleeping,
    Content,
    Neutral,
    Uneasy,
    Distressed,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dead => "dead",
            Self::Angry => "angry",
            Self::Hurt => "hurt",
            Self::Sleeping => "sleeping",
            Self::Content => "content",
            Self::Neutral => "neutral",
            Self::Uneasy => "uneasy",
            Self::Distressed => "distressed",
        }
    }
}

/// First match wins. `None` means no rule matched and the caller keeps its
/// current mood.
pub fn classify(health: f32, attacking: bool, hurting: bool, sleeping: bool) -> Option<Mood> {
    if health < 1.0 {
        Some(Mood::Dead)
    } else if attacking {
        Some(Mood::Angry)
    } else if hurting {
        Some(Mood::Hurt)
    } else if sleeping {
        Some(Mood::Sleeping)
    } else if health >= 10.0 {
        Some(Mood::Content)
    } else if health > 6.0 {
        Some(Mood::Neutral)
    } else if health > 3.0 {
        Some(Mood::Uneasy)
    } else if health > 1.0 {
        Some(Mood::Distressed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_bands() {
        assert_eq!(classify(11.0, false, false, false), Some(Mood::Content));
        assert_eq!(classify(10.0, false, false, false), Some(Mood::Content));
        assert_eq!(classify(9.99, false, false, false), Some(Mood::Neutral));
        assert_eq!(classify(6.0, false, false, false), Some(Mood::Uneasy));
        assert_eq!(classify(3.0, false, false, false), Some(Mood::Distressed));
        assert_eq!(classify(0.5, false, false, false), Some(Mood::Dead));
    }

    #[test]
    fn exactly_one_health_matches_nothing() {
        assert_eq!(classify(1.0, false, false, false), None);
    }

    #[test]
    fn activity_precedence() {
        assert_eq!(classify(5.0, true, true, true), Some(Mood::Angry));
        assert_eq!(classify(5.0, false, true, true), Some(Mood::Hurt));
        assert_eq!(classify(5.0, false, false, true), Some(Mood::Sleeping));
        assert_eq!(classify(0.0, true, true, true), Some(Mood::Dead));
    }
}
