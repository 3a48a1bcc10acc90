//! The shipped table of national space programs.

use crate::record::{Category, CountryEntry, Stats};
use crate::{Registry, RegistryBuilder, RegistryError};

struct Row {
    aliases: &'static [&'static str],
    status: &'static str,
    details: &'static str,
    stats: &'static [(&'static str, &'static str)],
    category: Category,
}

const NO_AGENCY: &[Row] = &[
    Row {
        aliases: &["Ireland"],
        status: "No Government Space Agency",
        details: "Manages space via Enterprise Ireland and participates through ESA membership. High-income economy with strong tech sector.",
        stats: &[("Space Approach", "ESA Member"), ("HDI Rank", "Very High"), ("GDP per Capita", "$89,383")],
        category: Category::NoAgency,
    },
    Row {
        aliases: &["Iceland"],
        status: "No Government Space Agency",
        details: "No government space agency (a private initiative exists). Not an ESA member. Consistently top-tier on human development.",
        stats: &[("Space Approach", "Private Only"), ("HDI Rank", "Very High"), ("GDP per Capita", "$69,420")],
        category: Category::NoAgency,
    },
    Row {
        aliases: &["Monaco"],
        status: "No National Space Agency",
        details: "No national agency or launch capability; small Office for Outer Space Affairs, relies on partnerships/slots.",
        stats: &[("Space Approach", "Partnerships"), ("HDI Rank", "Very High"), ("GDP per Capita", "$234,315")],
        category: Category::NoAgency,
    },
    Row {
        aliases: &["Liechtenstein"],
        status: "No Space Agency",
        details: "Adopted a Space Act framework; signed Artemis Accords to enable private participation. Very high HDI.",
        stats: &[("Space Approach", "Private Framework"), ("HDI Rank", "Very High"), ("GDP per Capita", "$139,100")],
        category: Category::NoAgency,
    },
    Row {
        aliases: &["Andorra"],
        status: "No Space Agency",
        details: "Works with ESA-linked firms for niche satellite applications. Very high HDI.",
        stats: &[("Space Approach", "ESA Partners"), ("HDI Rank", "Very High"), ("GDP per Capita", "$42,128")],
        category: Category::NoAgency,
    },
    Row {
        aliases: &["Brunei"],
        status: "No National Space Agency",
        details: "Engages via regional/international science bodies. Very high human development.",
        stats: &[("Space Approach", "Intl. Bodies"), ("HDI Rank", "Very High"), ("GDP per Capita", "$31,086")],
        category: Category::NoAgency,
    },
    Row {
        aliases: &["Qatar"],
        status: "No Government Space Agency",
        details: "Operates via Es'hailSat and partnerships; very high human development.",
        stats: &[("Space Approach", "Commercial Operator"), ("HDI Rank", "Very High"), ("GDP per Capita", "$66,838")],
        category: Category::NoAgency,
    },
];

const HAS_AGENCY: &[Row] = &[
    Row {
        aliases: &["United States of America", "United States", "USA", "US"],
        status: "Has National Space Agency (NASA)",
        details: "NASA runs broad civil space programs across science, exploration, Earth observation, and technology; deep commercial ecosystem.",
        stats: &[("Agency", "NASA"), ("Launch", "Yes"), ("Crew", "Yes")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["Russian Federation", "Russia"],
        status: "Has National Space Agency (Roscosmos)",
        details: "Long history in human spaceflight, launchers, planetary missions; significant industrial base.",
        stats: &[("Agency", "Roscosmos"), ("Launch", "Yes"), ("Crew", "Yes")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["China", "People\u{2019}s Republic of China", "PRC"],
        status: "Has National Space Agency (CNSA)",
        details: "Rapidly expanding program: crewed station, lunar/planetary probes, heavy-lift launch; robust domestic supply chain.",
        stats: &[("Agency", "CNSA"), ("Launch", "Yes"), ("Crew", "Yes")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["Japan"],
        status: "Has National Space Agency (JAXA)",
        details: "Strong science/tech focus: asteroid sample returns, Earth observation, launchers, participation in ISS and Artemis.",
        stats: &[("Agency", "JAXA"), ("Launch", "Yes"), ("Crew", "No domestic crewed launch")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["India"],
        status: "Has National Space Agency (ISRO)",
        details: "Cost-effective launchers, lunar/solar missions, deep Earth-observation portfolio, and expanding commercial sector.",
        stats: &[("Agency", "ISRO"), ("Launch", "Yes"), ("Crew", "Crewed in development")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["Canada"],
        status: "Has National Space Agency (CSA/ASC)",
        details: "Renowned for robotics (Canadarm), Earth observation, and partnerships across NASA/ESA/ISS/Artemis.",
        stats: &[("Agency", "CSA"), ("Launch", "No domestic orbital"), ("Crew", "Yes (via partners)")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["Brazil"],
        status: "Has National Space Agency (AEB/INPE)",
        details: "Earth observation, launcher development, international partnerships; active remote-sensing programs.",
        stats: &[("Agency", "AEB/INPE"), ("Launch", "Developing/limited"), ("Crew", "No")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["South Korea", "Republic of Korea"],
        status: "Has National Space Program (KARI)",
        details: "Active launch-vehicle development (Nuri), deepening Earth-observation and lunar plans.",
        stats: &[("Agency", "KARI"), ("Launch", "Yes"), ("Crew", "No")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["Israel"],
        status: "Has National Space Agency (ISA)",
        details: "Small but advanced program: Earth observation, smallsats, lunar attempts, and tech innovation.",
        stats: &[("Agency", "ISA"), ("Launch", "No domestic orbital"), ("Crew", "No")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["Iran", "Iran, Islamic Republic of"],
        status: "Has National Space Agency (ISA Iran)",
        details: "Runs satellite launches and technology development; human spaceflight not active.",
        stats: &[("Agency", "ISA (Iran)"), ("Launch", "Yes (limited)"), ("Crew", "No")],
        category: Category::HasAgency,
    },
    Row {
        aliases: &["North Korea", "Democratic People's Republic of Korea", "DPRK"],
        status: "Has National Program (NADA)",
        details: "Runs satellite launch attempts; program framed as civilian; geopolitical sensitivities apply.",
        stats: &[("Agency", "NADA"), ("Launch", "Yes (limited)"), ("Crew", "No")],
        category: Category::HasAgency,
    },
];

/// Builds the registry shown on the page: countries without a government
/// space agency first, then countries with one.
pub fn space_programs() -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    for row in NO_AGENCY.iter().chain(HAS_AGENCY) {
        let entry = CountryEntry {
            status: row.status.to_string(),
            details: row.details.to_string(),
            stats: row.stats.iter().copied().collect::<Stats>(),
            category: row.category,
        };
        builder.register(row.aliases, entry)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::space_programs;
    use crate::Category;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_table_loads() {
        let reg = space_programs().expect("builtin registry");
        assert_eq!(reg.records().len(), 18);
        let no_agency = reg
            .records()
            .into_iter()
            .filter(|r| r.category == Category::NoAgency)
            .count();
        assert_eq!(no_agency, 7);
    }

    #[test]
    fn dataset_spellings_match() {
        let reg = space_programs().expect("builtin registry");
        for name in [
            "United States of America",
            "USA",
            "Russia",
            "China",
            "South Korea",
            "Republic of Korea",
            "Iran",
            "North Korea",
            "Ireland",
        ] {
            assert!(reg.contains(name), "{name} should be registered");
        }
        assert_eq!(reg.lookup("us").expect("us").name, "United States of America");
        assert_eq!(reg.lookup("Germany"), None);
    }

    #[test]
    fn stats_keep_authoring_order() {
        let reg = space_programs().expect("builtin registry");
        let japan = reg.lookup("japan").expect("japan");
        let labels: Vec<&str> = japan.stats.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Agency", "Launch", "Crew"]);
        assert_eq!(japan.stats.get("Crew"), Some("No domestic crewed launch"));
    }
}
