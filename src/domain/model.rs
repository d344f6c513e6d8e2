use crate::utils::error::{MashupError, Result};
use std::fmt;
use std::str::FromStr;

/// Marker that separates an authority namespace from a local identifier
/// (e.g. `VIAF:78822798`). Ids carrying it name a person, never an object.
pub const AUTHORITY_SEPARATOR: char = ':';

fn require_non_empty(entity: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MashupError::ModelError {
            message: format!("{}.{} must not be empty", entity, field),
        });
    }
    Ok(())
}

/// An author of one or more cultural heritage objects. Identity is the id:
/// two records with the same id describe the same person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: String,
    name: String,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let id = id.into();
        require_non_empty("Person", "id", &id)?;
        Ok(Self {
            id,
            name: name.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Closed set of object classes the graph store can declare. The kind only
/// changes the label; every kind carries the same attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    NauticalChart,
    ManuscriptPlate,
    ManuscriptVolume,
    PrintedVolume,
    PrintedMaterial,
    Herbarium,
    Specimen,
    Painting,
    Model,
    Map,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 10] = [
        ObjectKind::NauticalChart,
        ObjectKind::ManuscriptPlate,
        ObjectKind::ManuscriptVolume,
        ObjectKind::PrintedVolume,
        ObjectKind::PrintedMaterial,
        ObjectKind::Herbarium,
        ObjectKind::Specimen,
        ObjectKind::Painting,
        ObjectKind::Model,
        ObjectKind::Map,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::NauticalChart => "NauticalChart",
            ObjectKind::ManuscriptPlate => "ManuscriptPlate",
            ObjectKind::ManuscriptVolume => "ManuscriptVolume",
            ObjectKind::PrintedVolume => "PrintedVolume",
            ObjectKind::PrintedMaterial => "PrintedMaterial",
            ObjectKind::Herbarium => "Herbarium",
            ObjectKind::Specimen => "Specimen",
            ObjectKind::Painting => "Painting",
            ObjectKind::Model => "Model",
            ObjectKind::Map => "Map",
        }
    }
}

impl FromStr for ObjectKind {
    type Err = MashupError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NauticalChart" => Ok(ObjectKind::NauticalChart),
            "ManuscriptPlate" => Ok(ObjectKind::ManuscriptPlate),
            "ManuscriptVolume" => Ok(ObjectKind::ManuscriptVolume),
            "PrintedVolume" => Ok(ObjectKind::PrintedVolume),
            "PrintedMaterial" => Ok(ObjectKind::PrintedMaterial),
            "Herbarium" => Ok(ObjectKind::Herbarium),
            "Specimen" => Ok(ObjectKind::Specimen),
            "Painting" => Ok(ObjectKind::Painting),
            "Model" => Ok(ObjectKind::Model),
            "Map" => Ok(ObjectKind::Map),
            other => Err(MashupError::UnknownObjectKind {
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A digitized cultural heritage object as described by the graph store.
/// Rebuilt from rows on every query; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CulturalHeritageObject {
    kind: ObjectKind,
    id: String,
    title: String,
    owner: String,
    place: String,
    date: Option<String>,
    authors: Vec<Person>,
}

impl CulturalHeritageObject {
    pub fn new(
        kind: ObjectKind,
        id: impl Into<String>,
        title: impl Into<String>,
        owner: impl Into<String>,
        place: impl Into<String>,
        date: Option<String>,
        authors: Vec<Person>,
    ) -> Result<Self> {
        let id = id.into();
        require_non_empty("CulturalHeritageObject", "id", &id)?;
        Ok(Self {
            kind,
            id,
            title: title.into(),
            owner: owner.into(),
            place: place.into(),
            date,
            authors,
        })
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Authors in source order. Possibly empty.
    pub fn authors(&self) -> &[Person] {
        &self.authors
    }
}

/// The five digitization workflow steps tracked by the tabular store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Acquisition,
    Processing,
    Modelling,
    Optimising,
    Exporting,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Acquisition,
        ActivityKind::Processing,
        ActivityKind::Modelling,
        ActivityKind::Optimising,
        ActivityKind::Exporting,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ActivityKind::Acquisition => "acquisition",
            ActivityKind::Processing => "processing",
            ActivityKind::Modelling => "modelling",
            ActivityKind::Optimising => "optimising",
            ActivityKind::Exporting => "exporting",
        }
    }

    /// The synthetic activity id is `<kind>-<n>`; the prefix before the first
    /// `-` names the table the row came from.
    pub fn from_activity_id(activity_id: &str) -> Result<Self> {
        let prefix = activity_id.split('-').next().unwrap_or("");
        match prefix {
            "acquisition" => Ok(ActivityKind::Acquisition),
            "processing" => Ok(ActivityKind::Processing),
            "modelling" => Ok(ActivityKind::Modelling),
            "optimising" => Ok(ActivityKind::Optimising),
            "exporting" => Ok(ActivityKind::Exporting),
            _ => Err(MashupError::UnknownActivityKind {
                activity_id: activity_id.to_string(),
            }),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One workflow step performed on an object. The referenced object is
/// resolved through the federation engine before construction; an activity
/// without a resolvable object is never built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    kind: ActivityKind,
    refers_to: CulturalHeritageObject,
    institute: String,
    person: Option<String>,
    start: Option<String>,
    end: Option<String>,
    tools: Vec<String>,
    technique: Option<String>,
}

impl Activity {
    /// `technique` is mandatory for acquisitions and rejected elsewhere.
    pub fn new(
        kind: ActivityKind,
        refers_to: CulturalHeritageObject,
        institute: impl Into<String>,
        person: Option<String>,
        start: Option<String>,
        end: Option<String>,
        tools: Vec<String>,
        technique: Option<String>,
    ) -> Result<Self> {
        match (kind, &technique) {
            (ActivityKind::Acquisition, None) => {
                return Err(MashupError::ModelError {
                    message: "Acquisition.technique is mandatory".to_string(),
                })
            }
            (ActivityKind::Acquisition, Some(_)) => {}
            (_, Some(_)) => {
                return Err(MashupError::ModelError {
                    message: format!("{}.technique is not a valid attribute", kind),
                })
            }
            (_, None) => {}
        }

        Ok(Self {
            kind,
            refers_to,
            institute: institute.into(),
            person,
            start,
            end,
            tools,
            technique,
        })
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn refers_to(&self) -> &CulturalHeritageObject {
        &self.refers_to
    }

    pub fn responsible_institute(&self) -> &str {
        &self.institute
    }

    pub fn responsible_person(&self) -> Option<&str> {
        self.person.as_deref()
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    /// Present exactly when `kind()` is `Acquisition`.
    pub fn technique(&self) -> Option<&str> {
        self.technique.as_deref()
    }
}

/// What an id lookup can resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Person(Person),
    Object(CulturalHeritageObject),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Person(p) => p.id(),
            Entity::Object(o) => o.id(),
        }
    }

    pub fn as_object(&self) -> Option<&CulturalHeritageObject> {
        match self {
            Entity::Object(o) => Some(o),
            Entity::Person(_) => None,
        }
    }
}

/// True when the id carries an authority namespace and therefore names a
/// person rather than an object.
pub fn is_person_id(id: &str) -> bool {
    id.contains(AUTHORITY_SEPARATOR)
}
