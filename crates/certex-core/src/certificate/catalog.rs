//! Boundary rules for certificate fields.
//!
//! Every field is described by a start anchor, the shape of its value and the
//! set of anchors that may follow it. One generic routine turns a rule into a
//! regex of the form `(?is)\A<anchor><sep>(<value>)(?:<end anchors>)`. The end
//! anchors are consumed by the match but are not part of the capture; rules
//! are matched independently against the full text, so consuming the next
//! field's anchor never hides it from that field's own rule.
//!
//! A rule only ever looks at the first occurrence of its anchor. When the
//! value there is missing, the field is empty; later occurrences of the same
//! words elsewhere in the document are never consulted.

use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::record::{
    BaseVehicleField as B, BrakeField as Br, EngineField as E, FuelField as F, Slot,
    SuspensionField as S, TransmissionField as T,
};

/// Shape of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Single line; ends at a newline, an end anchor, or end of text. The value
    /// may wrap onto the line after the anchor when that line does not start
    /// with an end anchor.
    Inline,
    /// Any text across lines up to an end anchor.
    Span,
    /// One or more non-empty lines, up to a line starting with an end anchor.
    Block,
    /// A run of digits.
    Number,
    /// Rest of the line.
    Line,
    /// Custom value pattern carrying its own capture groups.
    Pattern(&'static str),
}

/// Where a rule's capture groups go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Group 1 into one record slot.
    Slot(Slot),
    /// Groups 1-3 into length, width and height.
    Dimensions,
    /// Groups 1-3 are day, month name and year.
    IssueDate,
}

/// Declarative extraction rule.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub id: &'static str,
    pub anchor: &'static str,
    pub shape: Shape,
    pub ends: &'static [&'static str],
    pub capture: Capture,
}

impl FieldRule {
    const fn new(
        id: &'static str,
        anchor: &'static str,
        shape: Shape,
        ends: &'static [&'static str],
        capture: Capture,
    ) -> Self {
        Self { id, anchor, shape, ends, capture }
    }

    /// Build the regex source for this rule, anchored at the start of the
    /// haystack.
    pub fn pattern(&self) -> String {
        const WRAP: &str = r"[^\S\n]*(?:\n[^\S\n]*)?";
        let ends = self.ends.join("|");
        let body = match self.shape {
            Shape::Inline if ends.is_empty() => format!(r"{}([^\n]+?)(?:\n|$)", WRAP),
            Shape::Inline => format!(r"{}([^\n]+?)(?:\n|{}|$)", WRAP, ends),
            Shape::Span => format!(r"\s*(.+?)(?:{})", ends),
            Shape::Block => format!(r"\s*([^\n]+(?:\n[^\n]+)*?)\s*(?:{})", ends),
            Shape::Number => r"\s*(\d+)".to_string(),
            Shape::Line => r"[^\S\n]*([^\n]+)".to_string(),
            Shape::Pattern(value) => format!(r"\s*{}", value),
        };
        format!(r"(?is)\A(?:{}){}", self.anchor, body)
    }

    /// Regex matching a value that is really the start of a following field.
    fn leading_end_pattern(&self) -> Option<String> {
        if self.ends.is_empty() {
            return None;
        }
        Some(format!(r"(?is)\A(?:{})", self.ends.join("|")))
    }
}

/// Vehicle categories that carry extra rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Passenger car.
    M1,
    /// Bus.
    M3,
    /// Medium truck.
    N2,
    /// Heavy truck / tractor.
    N3,
    /// Heavy trailer.
    O4,
}

impl Category {
    pub const ALL: [Category; 5] = [Self::M1, Self::M3, Self::N2, Self::N3, Self::O4];

    /// Parse a category code such as `N3`, `N3G` or `М1` (Cyrillic letter).
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.trim().chars().map(|c| match c {
            'М' | 'м' => 'M',
            'Н' | 'н' => 'N',
            'О' | 'о' => 'O',
            c => c.to_ascii_uppercase(),
        });
        let letter = chars.next()?;
        let digit = chars.next()?;
        match (letter, digit) {
            ('M', '1') => Some(Self::M1),
            ('M', '3') => Some(Self::M3),
            ('N', '2') => Some(Self::N2),
            ('N', '3') => Some(Self::N3),
            ('O', '4') => Some(Self::O4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "M1",
            Self::M3 => "M3",
            Self::N2 => "N2",
            Self::N3 => "N3",
            Self::O4 => "O4",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use Capture::Slot as To;
use Shape::*;

const TRANSPORT_VEHICLE: &str = r"ТРАНСПОРТНОЕ\s+СРЕДСТВО";
const GENERAL_SECTION: &str = r"ОБЩИЕ\s+ХАРАКТЕРИСТИКИ";

/// Rules applied to every certificate, in document order.
pub const COMMON_RULES: &[FieldRule] = &[
    FieldRule::new("brand", r"МАРКА\b", Inline, &[r"КОММЕРЧЕСКОЕ"], To(Slot::Brand)),
    FieldRule::new("commercial_name", r"КОММЕРЧЕСКОЕ\s+НАИМЕНОВАНИЕ", Inline, &[r"ТИП\b"], To(Slot::CommercialName)),
    FieldRule::new("vehicle_type", r"ТИП\b", Inline, &[r"ШАССИ"], To(Slot::VehicleType)),
    FieldRule::new("chassis", r"ШАССИ\b", Inline, &[r"ИДЕНТИФИКАЦИОН"], To(Slot::Chassis)),
    FieldRule::new("vin", r"ИДЕНТИФИКАЦИОН\s*НЫЙ\s+НОМЕР\s*\(VIN\)", Inline, &[r"ГОД\b"], To(Slot::Vin)),
    FieldRule::new("year", r"ГОД\s+ВЫПУСКА", Inline, &[r"КАТЕГОРИЯ"], To(Slot::Year)),
    FieldRule::new("category", r"КАТЕГОРИЯ\b", Inline, &[r"ЭКОЛОГИЧЕСКИЙ"], To(Slot::Category)),
    FieldRule::new("eco_class", r"ЭКОЛОГИЧЕСКИЙ\s+КЛАСС", Inline, &[r"ЗАЯВИТЕЛЬ"], To(Slot::EcoClass)),
    FieldRule::new("applicant", r"ЗАЯВИТЕЛЬ\s+И\s+ЕГО\s+АДРЕС", Span, &[TRANSPORT_VEHICLE, GENERAL_SECTION, r"ИЗГОТОВИТЕЛЬ"], To(Slot::Applicant)),
    FieldRule::new("manufacturer", r"ИЗГОТОВИТЕЛЬ\s+И\s+ЕГО\s+АДРЕС", Span, &[r"СБОРОЧНЫЙ\s+ЗАВОД", TRANSPORT_VEHICLE, GENERAL_SECTION], To(Slot::Manufacturer)),
    FieldRule::new("assembly_plant", r"СБОРОЧНЫЙ\s+ЗАВОД\s+И\s+ЕГО\s+АДРЕС", Span, &[r"Колесная", TRANSPORT_VEHICLE, GENERAL_SECTION], To(Slot::AssemblyPlant)),
    FieldRule::new("wheel_formula", r"Колесная\s+формула\s*/\s*ведущие\s+колеса", Inline, &[r"Схема"], To(Slot::WheelFormula)),
    FieldRule::new("layout", r"Схема\s+компоновки\s+транспортного\s+средства", Inline, &[r"Исполнение", r"Тип\b"], To(Slot::Layout)),
    FieldRule::new("cargo_space", r"Исполнение\s+загрузочного\s+пространства", Inline, &[r"Кабина", r"Тип\b"], To(Slot::CargoSpace)),
    FieldRule::new("cabin", r"(?:^|\n)[^\S\n]*Кабина\b", Inline, &[r"Пассажировместимость", r"Масса"], To(Slot::Cabin)),
    FieldRule::new("body_type", r"Тип\s+кузова[^\n]*?/[^\n]*?двер(?:ей|и)", Inline, &[r"Количество"], To(Slot::BodyType)),
    FieldRule::new("seats", r"Количество\s+мест\s+спереди\s*/\s*сзади", Inline, &[r"Масса"], To(Slot::Seats)),
    FieldRule::new("curb_mass", r"Масса\s+транспортного\s+средства\s+в\s+снаряженном\s+состоянии,\s*кг", Number, &[], To(Slot::CurbMass)),
    FieldRule::new("max_mass", r"Технически\s+допустимая\s+максимальная\s+масса\s+транспортного\s+средства,\s*кг", Number, &[], To(Slot::MaxMass)),
    FieldRule::new(
        "dimensions",
        r"Габаритные\s+размеры,\s*мм",
        Pattern(r"-?\s*длина\s*(\d+)\s*-?\s*ширина\s*(\d+)\s*-?\s*высота\s*(\d+)"),
        &[],
        Capture::Dimensions,
    ),
    FieldRule::new("wheelbase", r"База,\s*мм", Number, &[], To(Slot::Wheelbase)),
    FieldRule::new("track", r"Колея\s+передних\s*/\s*задних\s+колес,\s*мм", Inline, &[r"Двигатель"], To(Slot::Track)),
    FieldRule::new("engine_model", r"Двигатель\s+внутреннего\s+сгорания\s*\(марка,\s*тип\)", Block, &[r"-\s*количество", GENERAL_SECTION], To(Slot::Engine(E::Model))),
    FieldRule::new("engine_cylinders", r"количество\s+и\s+расположение\s+цилиндров", Inline, &[r"-\s*рабочий"], To(Slot::Engine(E::Cylinders))),
    FieldRule::new("engine_displacement", r"рабочий\s+объем\s+цилиндров,\s*см(?:³|3)", Number, &[], To(Slot::Engine(E::Displacement))),
    FieldRule::new("engine_compression_ratio", r"степень\s+сжатия", Inline, &[r"-\s*максимальная"], To(Slot::Engine(E::CompressionRatio))),
    FieldRule::new("engine_power", r"максимальная\s+мощность,\s*кВт\s*\(мин-1\)", Inline, &[r"Топливо"], To(Slot::Engine(E::Power))),
    FieldRule::new("fuel_kind", r"Топливо\b", Inline, &[r"Система"], To(Slot::Fuel(F::Kind))),
    FieldRule::new("fuel_supply_system", r"Система\s+питания\s*\(тип\)", Inline, &[r"Система\s+выпуска"], To(Slot::Fuel(F::SupplySystem))),
    FieldRule::new("fuel_exhaust_system", r"Система\s+выпуска\s+и\s+нейтрализации\s+отработавших\s+газов", Block, &[r"Трансмиссия"], To(Slot::Fuel(F::ExhaustSystem))),
    FieldRule::new("transmission_kind", r"Трансмиссия\b", Inline, &[r"Сцепление"], To(Slot::Transmission(T::Kind))),
    FieldRule::new("transmission_clutch", r"Сцепление\s*\(марка,\s*тип\)", Inline, &[r"Коробка"], To(Slot::Transmission(T::Clutch))),
    FieldRule::new("transmission_gearbox", r"Коробка\s+передач\s*\(марка,\s*тип\)", Inline, &[r"Подвеска"], To(Slot::Transmission(T::Gearbox))),
    FieldRule::new("suspension_front", r"Подвеска\s*\(тип\)\s*Передняя", Block, &[r"Задняя"], To(Slot::Suspension(S::Front))),
    FieldRule::new("suspension_rear", r"\bЗадняя\b", Block, &[r"Рулевое"], To(Slot::Suspension(S::Rear))),
    FieldRule::new("steering", r"Рулевое\s+управление(?:\s*\(марка,\s*тип\))?", Block, &[r"Тормозные"], To(Slot::Steering)),
    FieldRule::new("brakes_service", r"-\s*рабочая", Block, &[r"-\s*запасная"], To(Slot::Brakes(Br::Service))),
    FieldRule::new("brakes_backup", r"-\s*запасная", Block, &[r"-\s*стояночная"], To(Slot::Brakes(Br::Backup))),
    FieldRule::new("brakes_parking", r"-\s*стояночная", Block, &[r"-\s*вспомогательная", r"Шины"], To(Slot::Brakes(Br::Parking))),
    FieldRule::new("brakes_auxiliary", r"-\s*вспомогательная\s*\(?износостойкая\)?", Block, &[r"Шины"], To(Slot::Brakes(Br::Auxiliary))),
    FieldRule::new("tires", r"Шины\b", Inline, &[r"Оборудование"], To(Slot::Tires)),
    FieldRule::new("equipment", r"Оборудование\s+транспортного\s+средства", Span, &[r"соответствуют", r"номер\s+УВЭОС"], To(Slot::Equipment)),
    FieldRule::new("emergency_call_id", r"номер\s+УВЭОС", Number, &[], To(Slot::EmergencyCallId)),
    FieldRule::new("base_vehicle_vin", r"Идентификационный\s+номер\s+шасси", Pattern(r"([A-Z0-9]+)"), &[], To(Slot::BaseVehicle(B::Vin))),
    FieldRule::new("base_vehicle_modification", r"модификации", Number, &[], To(Slot::BaseVehicle(B::Modification))),
    FieldRule::new(
        "issue_date",
        r"Дата\s+оформления",
        Pattern(r#"["«“]?\s*(\d{1,2})\s*["»”]?\s+([а-яё]+)\s+(\d{4})"#),
        &[],
        Capture::IssueDate,
    ),
    FieldRule::new(
        "registration_number",
        r"№\s*ТС",
        Pattern(r"([A-Z]{2}\s*[АA]\s*-\s*[A-Z]{2}\.\d+\.\d+)"),
        &[],
        To(Slot::RegistrationNumber),
    ),
];

const LAYOUT_ANCHOR: &str = r"Схема\s+компоновки(?:\s+транспортного\s+средства)?";

const M1_RULES: &[FieldRule] = &[
    FieldRule::new("passenger_capacity", r"Пассажировместимость\s*[-:]?", Number, &[], To(Slot::Extra("passenger_capacity"))),
    FieldRule::new("luggage_volume", r"Объем\s+багажника,\s*л", Number, &[], To(Slot::Extra("luggage_volume"))),
    FieldRule::new("airbags", r"Подушки\s+безопасности", Line, &[], To(Slot::Extra("airbags"))),
    FieldRule::new("climate_unit", r"Климатическая\s+установка", Line, &[], To(Slot::Extra("climate_unit"))),
    FieldRule::new("body_type", r"Тип\s+кузова[^\n]*?/[^\n]*?двер(?:ей|и)", Inline, &[r"Количество"], To(Slot::BodyType)),
    FieldRule::new("seats", r"Количество\s+мест[^\n]*?спереди[^\n]*?сзади", Pattern(r"(\d+\s*/\s*\d+)"), &[], To(Slot::Seats)),
    FieldRule::new("layout", LAYOUT_ANCHOR, Inline, &[r"Исполнение", r"Тип\b"], To(Slot::Layout)),
];

const M3_RULES: &[FieldRule] = &[
    FieldRule::new("passenger_capacity", r"Пассажировместимость\s*[-:]?", Number, &[], To(Slot::Extra("passenger_capacity"))),
    FieldRule::new("standing_places", r"Места\s+для\s+стояния\s*[-:]?", Number, &[], To(Slot::Extra("standing_places"))),
    FieldRule::new("emergency_exits", r"Аварийные\s+выходы", Line, &[], To(Slot::Extra("emergency_exits"))),
    FieldRule::new("route_indicators", r"Маршрутоуказатели", Line, &[], To(Slot::Extra("route_indicators"))),
    FieldRule::new("layout", LAYOUT_ANCHOR, Line, &[], To(Slot::Layout)),
];

const N2_RULES: &[FieldRule] = &[
    FieldRule::new("payload", r"Грузоподъемность,\s*кг", Number, &[], To(Slot::Extra("payload"))),
    FieldRule::new("cargo_volume", r"Объем\s+грузового\s+отсека,\s*м(?:³|3)", Pattern(r"(\d+(?:[.,]\d+)?)"), &[], To(Slot::Extra("cargo_volume"))),
    FieldRule::new("loading_height", r"Погрузочная\s+высота,\s*мм", Number, &[], To(Slot::Extra("loading_height"))),
    FieldRule::new("layout", LAYOUT_ANCHOR, Line, &[], To(Slot::Layout)),
];

const N3_RULES: &[FieldRule] = &[
    FieldRule::new("payload", r"Грузоподъемность,\s*кг", Number, &[], To(Slot::Extra("payload"))),
    FieldRule::new("fifth_wheel_load", r"Нагрузка\s+на\s+седельно-сцепное\s+устройство,\s*кг", Number, &[], To(Slot::Extra("fifth_wheel_load"))),
    FieldRule::new("towed_trailer_mass", r"Масса\s+буксируемого\s+прицепа,\s*кг", Number, &[], To(Slot::Extra("towed_trailer_mass"))),
    FieldRule::new("layout", LAYOUT_ANCHOR, Line, &[], To(Slot::Layout)),
];

const O4_RULES: &[FieldRule] = &[
    FieldRule::new("payload", r"Грузоподъемность,\s*кг", Number, &[], To(Slot::Extra("payload"))),
    FieldRule::new("axle_count", r"Количество\s+осей\s*[-:]?", Number, &[], To(Slot::Extra("axle_count"))),
    FieldRule::new("kingpin_load", r"Нагрузка\s+на\s+шкворень,\s*кг", Number, &[], To(Slot::Extra("kingpin_load"))),
    FieldRule::new("layout", LAYOUT_ANCHOR, Line, &[], To(Slot::Layout)),
];

/// Category-specific rules, applied after the common rules.
pub fn category_rules(category: Category) -> &'static [FieldRule] {
    match category {
        Category::M1 => M1_RULES,
        Category::M3 => M3_RULES,
        Category::N2 => N2_RULES,
        Category::N3 => N3_RULES,
        Category::O4 => O4_RULES,
    }
}

/// A rule with its compiled regexes.
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: &'static FieldRule,
    anchor: Regex,
    regex: Regex,
    leading_end: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: &'static FieldRule) -> Self {
        let build = |pattern: &str| {
            Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid pattern for field {}: {}", rule.id, e))
        };
        Self {
            rule,
            anchor: build(&format!("(?is){}", rule.anchor)),
            regex: build(&rule.pattern()),
            leading_end: rule.leading_end_pattern().as_deref().map(build),
        }
    }

    /// Capture groups of the rule at the first occurrence of its anchor.
    ///
    /// `None` when the anchor is absent, when the value at that occurrence
    /// does not fit the rule's shape, or when the captured text begins with
    /// one of the rule's end anchors (the value slot was left blank).
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        let start = self.anchor.find(text)?.start();
        let caps = self.regex.captures(&text[start..])?;
        if let (Some(leading_end), Some(value)) = (&self.leading_end, caps.get(1)) {
            if leading_end.is_match(value.as_str().trim_start()) {
                return None;
            }
        }
        Some(caps)
    }
}

/// Ordered, compiled field rule registry.
#[derive(Debug)]
pub struct FieldPatternCatalog {
    common: Vec<CompiledRule>,
    categories: Vec<(Category, Vec<CompiledRule>)>,
}

impl FieldPatternCatalog {
    fn build() -> Self {
        let common = COMMON_RULES.iter().map(CompiledRule::compile).collect();
        let categories = Category::ALL
            .iter()
            .map(|&c| (c, category_rules(c).iter().map(CompiledRule::compile).collect()))
            .collect();
        Self { common, categories }
    }

    /// Shared compiled catalog.
    pub fn global() -> &'static FieldPatternCatalog {
        &CATALOG
    }

    /// Rules applied to every document.
    pub fn common(&self) -> &[CompiledRule] {
        &self.common
    }

    /// Rules layered on top of the common rules for `category`.
    pub fn for_category(&self, category: Category) -> &[CompiledRule] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Common rules followed by the category rules, in lookup order.
    pub fn rules(&self, category: Option<Category>) -> impl Iterator<Item = &CompiledRule> {
        let extra = category.map(|c| self.for_category(c)).unwrap_or(&[]);
        self.common.iter().chain(extra.iter())
    }
}

lazy_static! {
    static ref CATALOG: FieldPatternCatalog = FieldPatternCatalog::build();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        let catalog = FieldPatternCatalog::global();
        assert_eq!(catalog.common().len(), COMMON_RULES.len());
        for category in Category::ALL {
            assert_eq!(
                catalog.for_category(category).len(),
                category_rules(category).len()
            );
        }
    }

    #[test]
    fn test_common_ids_unique() {
        let mut ids: Vec<_> = COMMON_RULES.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), COMMON_RULES.len());
    }

    #[test]
    fn test_inline_stops_before_next_anchor() {
        let rule = &COMMON_RULES[0];
        let re = Regex::new(&rule.pattern()).unwrap();
        let caps = re.captures("МАРКА VolvoКОММЕРЧЕСКОЕ НАИМЕНОВАНИЕ FH16").unwrap();
        assert_eq!(&caps[1], "Volvo");
    }

    fn common_rule(id: &str) -> &'static CompiledRule {
        FieldPatternCatalog::global()
            .common()
            .iter()
            .find(|r| r.rule.id == id)
            .unwrap()
    }

    #[test]
    fn test_inline_blank_value_before_next_field() {
        let chassis = common_rule("chassis");
        assert!(chassis.captures("ШАССИ\nИДЕНТИФИКАЦИОННЫЙ НОМЕР (VIN) X").is_none());

        let brand = common_rule("brand");
        assert!(brand.captures("МАРКА КОММЕРЧЕСКОЕ НАИМЕНОВАНИЕ FH").is_none());
    }

    #[test]
    fn test_inline_value_wrapped_to_next_line() {
        let vin = common_rule("vin");
        let caps = vin
            .captures("ИДЕНТИФИКАЦИОННЫЙ НОМЕР (VIN)\nYV2RT40A5KB123456\nГОД ВЫПУСКА 2019")
            .unwrap();
        assert_eq!(&caps[1], "YV2RT40A5KB123456");

        let year = common_rule("year");
        let caps = year.captures("ГОД ВЫПУСКА  \n 2019\nКАТЕГОРИЯ N3").unwrap();
        assert_eq!(&caps[1], "2019");
    }

    #[test]
    fn test_inline_does_not_skip_an_empty_line() {
        let year = common_rule("year");
        assert!(year.captures("ГОД ВЫПУСКА\n\n2019").is_none());
    }

    #[test]
    fn test_only_first_anchor_occurrence_is_used() {
        let brand = common_rule("brand");
        let text = "МАРКА\nКОММЕРЧЕСКОЕ НАИМЕНОВАНИЕ FH\n\
                    Двигатель внутреннего сгорания (марка, тип) VOLVO D13K460";
        assert!(brand.captures(text).is_none());
    }

    #[test]
    fn test_rules_order_common_then_category() {
        let catalog = FieldPatternCatalog::global();
        let ids: Vec<_> = catalog.rules(Some(Category::O4)).map(|r| r.rule.id).collect();

        assert_eq!(ids.first(), Some(&"brand"));
        assert_eq!(ids.len(), COMMON_RULES.len() + O4_RULES.len());
        assert_eq!(ids.last(), Some(&"layout"));
        assert_eq!(catalog.rules(None).count(), COMMON_RULES.len());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("N3"), Some(Category::N3));
        assert_eq!(Category::parse(" n3G "), Some(Category::N3));
        assert_eq!(Category::parse("М1"), Some(Category::M1));
        assert_eq!(Category::parse("О4"), Some(Category::O4));
        assert_eq!(Category::parse("N1"), None);
        assert_eq!(Category::parse(""), None);
    }
}
