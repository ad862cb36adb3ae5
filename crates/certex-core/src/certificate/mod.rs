//! Certificate text processing: cleanup, field rules, extraction and validation.

pub mod catalog;
pub mod dates;
mod extractor;
pub mod normalize;
pub mod validate;

pub use catalog::{Category, FieldPatternCatalog, FieldRule, Shape};
pub use dates::IssueDate;
pub use extractor::{ExtractionResult, RecordExtractor, clean_value};
pub use normalize::normalize;
pub use validate::{check, validate};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for certificate parsers working on raw document text.
pub trait CertificateParser {
    /// Normalize raw text and extract a record from it.
    fn parse(&self, raw: &str, category_hint: Option<&str>) -> Result<ExtractionResult>;
}

/// Reject text that cannot be a document: empty or whitespace only.
pub fn ensure_usable(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyInput);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod sample {
    /// Text layer of a tractor unit certificate.
    pub const SAMPLE_N3: &str = r#"Свидетельство о безопасности конструкции транспортного средства № ТС BY А-BY.1739.14360
МАРКА VOLVO
КОММЕРЧЕСКОЕ НАИМЕНОВАНИЕ FH
ТИП FH 4X2
ШАССИ ОТСУТСТВУЕТ
ИДЕНТИФИКАЦИОННЫЙ НОМЕР (VIN) YV2RT40A5KB123456
ГОД ВЫПУСКА 2019
КАТЕГОРИЯ N3
ЭКОЛОГИЧЕСКИЙ КЛАСС ПЯТЫЙ
ЗАЯВИТЕЛЬ И ЕГО АДРЕС ООО "ТРАК ИМПОРТ"
220000, г. Минск, ул. Промышленная, 1
ИЗГОТОВИТЕЛЬ И ЕГО АДРЕС VOLVO TRUCK CORPORATION
Швеция, Гётеборг
СБОРОЧНЫЙ ЗАВОД И ЕГО АДРЕС VOLVO GROUP TRUCKS OPERATIONS
Бельгия, Гент
ОБЩИЕ ХАРАКТЕРИСТИКИ ТРАНСПОРТНОГО СРЕДСТВА
Колесная формула / ведущие колеса 4x2 / задние
Схема компоновки транспортного средства капотная
Исполнение загрузочного пространства седельный тягач
Кабина спальная, над двигателем
Масса транспортного средства в снаряженном состоянии, кг 7850
Технически допустимая максимальная масса транспортного средства, кг 19000
Грузоподъемность, кг 11150
Нагрузка на седельно-сцепное устройство, кг 11000
Масса буксируемого прицепа, кг 36000
Габаритные размеры, мм
- длина 5950
- ширина 2500
- высота 3850
База, мм 3700
Колея передних / задних колес, мм 2030/1820
Двигатель внутреннего сгорания (марка, тип) VOLVO D13K460,
дизельный с турбонаддувом
- количество и расположение цилиндров 6, рядное
- рабочий объем цилиндров, см3 12777
- степень сжатия 17,5
- максимальная мощность, кВт (мин-1) 338 (1400-1800)
Топливо дизельное топливо
Система питания (тип) непосредственный впрыск
Система выпуска и нейтрализации отработавших газов глушитель,
каталитический нейтрализатор
Трансмиссия механическая
Сцепление (марка, тип) VOLVO, однодисковое сухое
Коробка передач (марка, тип) VOLVO I-SHIFT, автоматизированная
Подвеска (тип) Передняя зависимая, рессорная
Задняя зависимая, пневматическая
Рулевое управление (марка, тип) ZF 8098, с гидроусилителем
Тормозные системы
- рабочая пневматическая, дисковые
- запасная одна из цепей рабочей
- стояночная пружинные энергоаккумуляторы
- вспомогательная (износостойкая) моторный тормоз
Шины 315/70R22.5
Оборудование транспортного средства тахограф,
система экстренного вызова
номер УВЭОС 123456789012345
Дата оформления "05" мая 2025
"#;

    /// Stamp and running header between two pages.
    pub const SAMPLE_PAGE_BREAK: &str = "М.П.Стр.1ТС BY А-BY.1739.14360Свидетельство о безопасности конструкции транспортного средства №";
}
