/// Language of user-facing strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Self::En),
            "id" | "indonesian" | "bahasa" => Some(Self::Id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Id => "id",
        }
    }

    /// Assistant turn used in place of a failed completion
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::En => "An error occurred. Please try again.",
            Self::Id => "Terjadi kesalahan. Silakan coba lagi.",
        }
    }

    /// Status line shown while a request is outstanding
    pub fn waiting_message(&self) -> &'static str {
        match self {
            Self::En => "Waiting response...",
            Self::Id => "Menunggu respons...",
        }
    }

    pub fn input_placeholder(&self) -> &'static str {
        match self {
            Self::En => "Message to AiryAI",
            Self::Id => "Pesan untuk AiryAI",
        }
    }

    pub fn interrupted_message(&self) -> &'static str {
        match self {
            Self::En => "Request interrupted",
            Self::Id => "Permintaan dibatalkan",
        }
    }

    pub fn goodbye_message(&self) -> &'static str {
        match self {
            Self::En => "Goodbye!",
            Self::Id => "Sampai jumpa!",
        }
    }
}
