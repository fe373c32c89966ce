//! Fixed lookup tables used by the matching rules.

/// Skill family with tiers ordered from most to least established.
pub(crate) struct SkillCategory {
    pub key: &'static str,
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
    pub emerging: &'static [&'static str],
}

impl SkillCategory {
    pub fn contains(&self, skill: &str) -> bool {
        self.primary
            .iter()
            .chain(self.secondary)
            .chain(self.emerging)
            .any(|entry| *entry == skill)
    }
}

pub(crate) const SKILL_CATEGORIES: &[SkillCategory] = &[
    SkillCategory {
        key: "frontend",
        primary: &["react", "angular", "vue", "javascript", "typescript", "html", "css"],
        secondary: &["sass", "webpack", "redux", "next.js", "tailwind", "jquery"],
        emerging: &["svelte", "solid", "astro", "qwik"],
    },
    SkillCategory {
        key: "backend",
        primary: &["node.js", "python", "java", "c#", "php", "go"],
        secondary: &["express", "django", "spring", ".net", "laravel", "fastapi"],
        emerging: &["rust", "deno", "bun", "elixir"],
    },
    SkillCategory {
        key: "database",
        primary: &["sql", "mysql", "postgresql", "mongodb"],
        secondary: &["redis", "oracle", "sql server", "elasticsearch"],
        emerging: &["dynamodb", "cassandra", "neo4j", "supabase"],
    },
    SkillCategory {
        key: "cloud",
        primary: &["aws", "azure", "gcp", "docker"],
        secondary: &["kubernetes", "terraform", "jenkins", "ci/cd"],
        emerging: &["serverless", "pulumi", "argocd"],
    },
    SkillCategory {
        key: "dataScience",
        primary: &["python", "r", "machine learning", "statistics"],
        secondary: &["tensorflow", "pytorch", "pandas", "numpy", "scikit-learn"],
        emerging: &["llm", "mlops", "langchain"],
    },
    SkillCategory {
        key: "mobile",
        primary: &["react native", "flutter", "swift", "kotlin"],
        secondary: &["android", "ios", "xamarin", "ionic"],
        emerging: &["kotlin multiplatform", "swiftui", "jetpack compose"],
    },
];

/// Categories a normalized (lowercase) skill belongs to.
pub(crate) fn categories_for(skill: &str) -> impl Iterator<Item = &'static SkillCategory> + '_ {
    SKILL_CATEGORIES
        .iter()
        .filter(move |category| category.contains(skill))
}

const RELATED_INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "technology",
        &["fintech", "software", "telecommunications", "consulting", "e-commerce"],
    ),
    ("finance", &["fintech", "banking", "insurance", "consulting"]),
    ("healthcare", &["pharmaceutical", "biotechnology", "insurance"]),
    ("education", &["edtech", "technology", "consulting"]),
    ("retail", &["e-commerce", "logistics", "consumer goods"]),
    ("manufacturing", &["logistics", "automotive", "energy"]),
    ("marketing", &["advertising", "media", "e-commerce", "consulting"]),
];

/// Whether `job_industry` is listed as related to `candidate_industry`.
pub(crate) fn industries_related(candidate_industry: &str, job_industry: &str) -> bool {
    RELATED_INDUSTRIES
        .iter()
        .find(|(key, _)| *key == candidate_industry)
        .map(|(_, related)| related.iter().any(|entry| *entry == job_industry))
        .unwrap_or(false)
}
