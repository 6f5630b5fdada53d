//! Keyword ladders, one per persona
//!
//! Rules are tried in table order and the first rule with a keyword contained
//! in the input answers. Several keywords can co-occur in one message, so the
//! order of each table is part of its behavior.

/// Keywords mapped to a fixed response
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

impl Rule {
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|keyword| normalized.contains(keyword))
    }
}

/// Ordered rules plus the answer when none match
#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    pub rules: &'static [Rule],
    pub fallback: &'static str,
}

impl Ladder {
    /// Response of the first matching rule, if any
    pub fn first_match(&self, normalized: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(normalized))
            .map(|rule| rule.response)
    }

    pub fn answer(&self, normalized: &str) -> &'static str {
        self.first_match(normalized).unwrap_or(self.fallback)
    }
}

pub const GENERAL: Ladder = Ladder {
    rules: &[
        Rule {
            keywords: &["hi", "hello"],
            response: "Namaste! How can I assist you today?",
        },
        Rule {
            keywords: &["scheme", "benefit"],
            response: "You can explore schemes in the 'Discover Benefits' section. Or ask the 'Schemes' bot tab!",
        },
        Rule {
            keywords: &["portal", "app"],
            response: "This is the Bharat Seva Portal, a one-stop solution for government benefits.",
        },
    ],
    fallback: "I can help with general queries. For specific schemes, try the 'Schemes' tab!",
};

/// Consulted only after the catalog lookup misses
pub const SCHEME: Ladder = Ladder {
    rules: &[Rule {
        keywords: &["list", "all"],
        response: "We have schemes like PM-KISAN, PM-JAY, Mudra Yojana, Atal Pension, and more.",
    }],
    fallback: "I couldn't find a specific scheme matching that. Try 'PM Kisan' or 'Pension'.",
};

pub const ELIGIBILITY: Ladder = Ladder {
    rules: &[
        Rule {
            keywords: &["income"],
            response: "Income limits vary. Usually below ₹2 Lakh for farmer schemes and ₹5 Lakh for health schemes.",
        },
        Rule {
            keywords: &["student"],
            response: "Students can apply for Post Matric Scholarships if family income is < ₹2.5 Lakh.",
        },
        Rule {
            keywords: &["senior", "age"],
            response: "Senior citizens (60+) are eligible for NSAP pension and special PMAY benefits.",
        },
    ],
    fallback: "Tell me your Age, Income, and Occupation, and I'll suggest what fits!",
};

pub const SUPPORT: Ladder = Ladder {
    rules: &[
        Rule {
            keywords: &["document"],
            response: "Common documents: Aadhaar Card, Income Certificate, Caste Certificate (if applicable), and Bank Passbook.",
        },
        Rule {
            keywords: &["apply"],
            response: "Click the 'Apply Now' button on any scheme card. You'll be redirected to the official government portal.",
        },
        Rule {
            keywords: &["error", "fail"],
            response: "Please check your internet connection or try clearing your browser cache.",
        },
    ],
    fallback: "I can guide you on documents and application steps. What do you need help with?",
};
