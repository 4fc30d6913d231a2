use serde::{Deserialize, Serialize};

/// Уникальный идентификатор маркера
pub type MarkerId = String;

/// Идентификатор региона внутри сценария
pub type RegionId = String;

/// 2D-точка в координатах поверхности
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Индексы узла сетки (столбец, строка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i64,
    pub row: i64,
}

impl GridCell {
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

/// Размеры рабочей поверхности (начало координат в (0, 0))
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

/// Форма региона
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionShape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polygon {
        points: Vec<Point2D>,
    },
    Circle {
        center: Point2D,
        radius: f64,
    },
}

/// Регион поверхности. Допустимость задаётся списком, в котором он лежит
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    /// Подпись для отображения
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub shape: RegionShape,
}

impl Region {
    /// Подпись, а при её отсутствии идентификатор
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Метод размещения точек отбора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMethod {
    Random,
    #[default]
    Systematic,
    Stratified,
    Diagonal,
}

/// Подсказки отображения и привязки для метода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodConfig {
    pub grid_guides: bool,
    pub diagonal_guides: bool,
    pub snap: bool,
}

impl PlacementMethod {
    pub fn all() -> &'static [PlacementMethod] {
        &[
            PlacementMethod::Random,
            PlacementMethod::Systematic,
            PlacementMethod::Stratified,
            PlacementMethod::Diagonal,
        ]
    }

    pub fn config(&self) -> MethodConfig {
        match self {
            PlacementMethod::Random => MethodConfig {
                grid_guides: false,
                diagonal_guides: false,
                snap: false,
            },
            PlacementMethod::Systematic => MethodConfig {
                grid_guides: true,
                diagonal_guides: false,
                snap: true,
            },
            PlacementMethod::Stratified => MethodConfig {
                grid_guides: true,
                diagonal_guides: false,
                snap: true,
            },
            PlacementMethod::Diagonal => MethodConfig {
                grid_guides: false,
                diagonal_guides: true,
                snap: false,
            },
        }
    }

    /// Позиция на шкале «от случайного к регулярному»
    pub fn rank(&self) -> u8 {
        match self {
            PlacementMethod::Random => 0,
            PlacementMethod::Stratified => 1,
            PlacementMethod::Systematic => 2,
            PlacementMethod::Diagonal => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlacementMethod::Random => "Random",
            PlacementMethod::Systematic => "Systematic grid",
            PlacementMethod::Stratified => "Stratified",
            PlacementMethod::Diagonal => "Diagonal",
        }
    }
}

/// Итоговое заключение по партии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Qualified,
    Unqualified,
}

/// Описание сценария в том виде, в каком его присылает хост
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub surface: Surface,
    #[serde(default)]
    pub valid_regions: Vec<Region>,
    #[serde(default)]
    pub invalid_regions: Vec<Region>,
    /// Объём партии; из него выводится минимальное число точек
    pub capacity: f64,
    /// Шаг сетки привязки
    pub cell_size: f64,
    #[serde(default)]
    pub recommended_method: PlacementMethod,
    /// Эталонная расстановка
    #[serde(default)]
    pub reference_points: Vec<Point2D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_judgment: Option<Judgment>,
}

/// Поставленная точка отбора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub label: String,
    pub position: Point2D,
    /// Узел сетки, если метод использует привязку
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<GridCell>,
    /// Логический порядковый номер создания
    pub created_at: u64,
}

/// Запись сессии для внешнего хранилища
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub scenario_id: String,
    pub markers: Vec<Marker>,
    /// Затраченное время, секунды
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub method: PlacementMethod,
}
