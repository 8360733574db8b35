use micro_orm::{Database, Model};
use micro_wrap::{Proxy, Wrapped};

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    rows: u32,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, rows: u32) -> Self {
        Self { name, group, rows }
    }

    pub fn small(name: &'static str) -> Self {
        Self::new(name, TestGroup::Small, 16)
    }

    pub fn normal(name: &'static str) -> Self {
        Self::new(name, TestGroup::Normal, 1_024)
    }

    pub fn large(name: &'static str) -> Self {
        Self::new(name, TestGroup::Large, 65_536)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Builds a database holding `rows` [`Row`]s.
    pub fn database(&self) -> Database {
        let db = Database::builder().alias("bench").register::<Row>().build();
        for id in 0..self.rows {
            db.insert(Row { id, score: u64::from(id % 97) }).expect("ids should be unique");
        }
        db
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

#[derive(Debug)]
pub struct Row {
    pub id: u32,
    pub score: u64,
}

impl Model for Row {
    const NAME: &'static str = "row";
    type Pk = u32;

    fn pk(&self) -> u32 {
        self.id
    }
}

/// A proxy doing nothing but sitting in the chain.
#[derive(Debug)]
pub struct Passthrough(Wrapped<Row>);

impl Proxy for Passthrough {
    type Model = Row;

    fn new(inner: Wrapped<Row>) -> Self {
        Self(inner)
    }

    fn wrapped(&self) -> &Wrapped<Row> {
        &self.0
    }
}

/// A proxy deriving a value from the record underneath.
#[derive(Debug)]
pub struct Doubled(Wrapped<Row>);

impl Doubled {
    pub fn score(&self) -> u64 {
        self.0.score * 2
    }
}

impl Proxy for Doubled {
    type Model = Row;

    fn new(inner: Wrapped<Row>) -> Self {
        Self(inner)
    }

    fn wrapped(&self) -> &Wrapped<Row> {
        &self.0
    }
}
