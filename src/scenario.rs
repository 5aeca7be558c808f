use anyhow::Context;
use glob::glob;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Step에 첨부되는 여러 줄 텍스트 인자이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocString {
    /// 원문 텍스트 블록.
    pub content: String,
    /// 선택적인 미디어 타입 표기.
    #[serde(default)]
    pub media_type: Option<String>,
}

impl DocString {
    /// 본문만으로 DocString을 생성한다.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            media_type: None,
        }
    }
}

/// 테이블의 한 행이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    /// 행의 셀 문자열 목록.
    pub cells: Vec<String>,
}

/// Step에 첨부되는 표 형태 인자이다. 첫 행은 헤더로 취급한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// 헤더를 포함한 전체 행 목록.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// 문자열 슬라이스 배열로부터 테이블을 만든다.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| TableRow {
                    cells: row.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    /// 헤더 행을 반환한다.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// 헤더를 제외한 데이터 행을 반환한다.
    pub fn data_rows(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Step에 첨부 가능한 구조화 인자이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepArgument {
    /// 여러 줄 텍스트.
    DocString(DocString),
    /// 표.
    Table(Table),
}

/// Scenario 안의 한 줄 동작을 표현한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 패턴과 매칭할 Step 문장.
    pub text: String,
    /// 첨부된 구조화 인자.
    #[serde(default)]
    pub argument: Option<StepArgument>,
}

impl Step {
    /// 인자 없는 Step을 만든다.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            argument: None,
        }
    }

    /// DocString을 첨부한다.
    pub fn with_doc_string(mut self, doc: DocString) -> Self {
        self.argument = Some(StepArgument::DocString(doc));
        self
    }

    /// Table을 첨부한다.
    pub fn with_table(mut self, table: Table) -> Self {
        self.argument = Some(StepArgument::Table(table));
        self
    }
}

/// Scenario는 하나의 테스트 케이스를 이루는 Step 목록이다.
///
/// 이름과 태그는 엔진이 해석하지 않고 훅과 포매터에 그대로 전달한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// 시나리오 표시 이름.
    pub name: String,
    /// 태그 목록.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Step 목록.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// 이름과 Step 목록으로 Scenario를 만든다.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            steps,
        }
    }

    /// 전체 Step 수를 반환한다.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Step 수가 비었는지 여부를 확인한다.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// YAML 파일을 읽어 Scenario 목록으로 역직렬화한다.
pub fn load_scenarios_from_file(path: &Path) -> anyhow::Result<Vec<Scenario>> {
    let mut file = File::open(path)
        .with_context(|| format!("시나리오 파일을 열 수 없습니다: {}", path.display()))?;
    load_scenarios_from_reader(&mut file)
        .with_context(|| format!("시나리오 파일 파싱 실패: {}", path.display()))
}

/// Reader에서 YAML을 읽어 Scenario 목록으로 파싱한다.
pub fn load_scenarios_from_reader<R: Read>(reader: &mut R) -> anyhow::Result<Vec<Scenario>> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    let scenarios: Vec<Scenario> = serde_yaml::from_str(&buf)?;
    Ok(scenarios)
}

/// glob 패턴에 해당하는 모든 YAML 파일을 경로 순으로 읽어 합친다.
pub fn load_scenarios_from_glob(pattern: &str) -> anyhow::Result<Vec<Scenario>> {
    let mut paths = Vec::new();
    for entry in glob(pattern).context("glob 패턴 파싱 실패")? {
        paths.push(entry?);
    }
    paths.sort();
    let mut scenarios = Vec::new();
    for path in paths {
        scenarios.extend(load_scenarios_from_file(&path)?);
    }
    Ok(scenarios)
}
