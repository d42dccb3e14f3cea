// 🧾 Chart Report - the serialized form of a chart
//
// All display strings are produced here; the chart itself stays typed.

use serde::Serialize;

use crate::chart::{Chart, PillarDetail, Position};
use crate::symbols::Element;

const TRUE_SOLAR_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One value per pillar position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionMap<T> {
    pub year: T,
    pub month: T,
    pub day: T,
    pub hour: T,
}

impl<T> PositionMap<T> {
    fn from_chart(chart: &Chart, f: impl Fn(&PillarDetail) -> T) -> Self {
        PositionMap {
            year: f(chart.pillar(Position::Year)),
            month: f(chart.pillar(Position::Month)),
            day: f(chart.pillar(Position::Day)),
            hour: f(chart.pillar(Position::Hour)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarDateReport {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub leap: bool,
}

/// Element chains across the four pillars, year first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relations {
    pub stems: String,
    pub branches: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementWeights {
    pub wood: f64,
    pub fire: f64,
    pub earth: f64,
    pub metal: f64,
    pub water: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReport {
    pub pillars: PositionMap<String>,
    pub stems: PositionMap<String>,
    pub branches: PositionMap<String>,
    pub elements: PositionMap<String>,
    pub ten_gods: PositionMap<String>,
    /// Hidden stems with their element, e.g. "癸水".
    pub hidden_stems: PositionMap<Vec<String>>,
    pub hidden_stem_gods: PositionMap<Vec<String>>,
    pub na_yin: PositionMap<String>,
    pub markers: PositionMap<Vec<String>>,
    pub relations: Relations,
    pub five_elements: ElementWeights,
    pub voids: Vec<String>,
    pub lunar_date: LunarDateReport,
    /// Zodiac branch of the lunar year, e.g. "巳".
    pub zodiac: String,
    pub zodiac_animal: String,
    pub true_solar_time: String,
    pub hour_branch: String,
    pub solar_month: u32,
}

impl From<&Chart> for ChartReport {
    fn from(chart: &Chart) -> Self {
        let tally = &chart.element_tally;
        let lunar = chart.lunar_date;

        ChartReport {
            pillars: PositionMap::from_chart(chart, |d| d.pillar.to_string()),
            stems: PositionMap::from_chart(chart, |d| d.pillar.stem().to_string()),
            branches: PositionMap::from_chart(chart, |d| d.pillar.branch().to_string()),
            elements: PositionMap::from_chart(chart, |d| d.stem_element.to_string()),
            ten_gods: PositionMap::from_chart(chart, |d| d.ten_god.to_string()),
            hidden_stems: PositionMap::from_chart(chart, |d| {
                d.hidden_stems
                    .iter()
                    .map(|(stem, _)| format!("{}{}", stem, stem.element()))
                    .collect()
            }),
            hidden_stem_gods: PositionMap::from_chart(chart, |d| {
                d.hidden_stems.iter().map(|(_, god)| god.to_string()).collect()
            }),
            na_yin: PositionMap::from_chart(chart, |d| d.na_yin.to_string()),
            markers: PositionMap::from_chart(chart, |d| {
                d.markers.iter().map(|m| m.to_string()).collect()
            }),
            relations: relations(chart),
            five_elements: ElementWeights {
                wood: tally.get(Element::Wood),
                fire: tally.get(Element::Fire),
                earth: tally.get(Element::Earth),
                metal: tally.get(Element::Metal),
                water: tally.get(Element::Water),
            },
            voids: chart.void_branches.iter().map(|b| b.to_string()).collect(),
            lunar_date: LunarDateReport {
                year: lunar.year,
                month: lunar.month,
                day: lunar.day,
                leap: lunar.leap,
            },
            zodiac: chart.zodiac.to_string(),
            zodiac_animal: chart.zodiac.zodiac().to_string(),
            true_solar_time: chart.true_solar_time.format(TRUE_SOLAR_FORMAT).to_string(),
            hour_branch: chart.hour_branch.to_string(),
            solar_month: chart.solar_month,
        }
    }
}

fn relations(chart: &Chart) -> Relations {
    let stems: Vec<String> = chart
        .pillars
        .iter()
        .map(|d| format!("{}{}", d.pillar.stem(), d.stem_element))
        .collect();
    let branches: Vec<String> = chart
        .pillars
        .iter()
        .map(|d| d.pillar.branch().to_string())
        .collect();

    Relations {
        stems: stems.join("→"),
        branches: branches.join("→"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BirthMoment, ChartBuilder};
    use crate::fixtures::{at, sample_calendar};

    fn report_1990() -> ChartReport {
        let chart = ChartBuilder::new(sample_calendar())
            .build(&BirthMoment {
                civil: at(1990, 1, 1, 0, 0),
                longitude: 116.4,
            })
            .unwrap();
        ChartReport::from(&chart)
    }

    #[test]
    fn test_report_strings() {
        let report = report_1990();

        assert_eq!(report.pillars.year, "己巳");
        assert_eq!(report.pillars.day, "乙丑");
        assert_eq!(report.stems.month, "丙");
        assert_eq!(report.branches.hour, "子");
        assert_eq!(report.ten_gods.day, "日主");
        assert_eq!(report.ten_gods.year, "偏财");
        assert_eq!(report.hidden_stems.day, vec!["己土", "辛金", "癸水"]);
        assert_eq!(report.true_solar_time, "1989-12-31 23:45");
        assert_eq!(report.hour_branch, "子");
        assert_eq!(report.zodiac, "巳");
        assert_eq!(report.zodiac_animal, "蛇");
        assert_eq!(report.relations.stems, "己土→丙火→乙木→丙火");
        assert_eq!(report.relations.branches, "巳→子→丑→子");
    }

    #[test]
    fn test_report_json_keys_are_camel_case() {
        let json = serde_json::to_value(report_1990()).unwrap();

        assert_eq!(json["pillars"]["month"], "丙子");
        assert_eq!(json["lunarDate"]["month"], 12);
        assert_eq!(json["lunarDate"]["leap"], false);
        assert_eq!(json["trueSolarTime"], "1989-12-31 23:45");
        assert!(json["hiddenStemGods"]["year"].is_array());
        assert!(json["naYin"]["day"].is_string());
        assert_eq!(json["fiveElements"]["fire"], 2.5);
        assert_eq!(json["zodiac"], "巳");
        assert_eq!(json["zodiacAnimal"], "蛇");
        assert_eq!(json["voids"].as_array().unwrap().len(), 2);
    }
}
