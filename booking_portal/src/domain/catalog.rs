use crate::domain::booking::BookingTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingType {
    Sale,
    Rent,
    Lease,
}

// A property card as shown on the listings section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySummary {
    pub id: u32,
    pub title: String,
    pub location: String,
    pub price: String,
    pub listing_type: ListingType,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub featured: bool,
    pub tags: Vec<String>,
}

impl PropertySummary {
    pub fn target(&self) -> BookingTarget {
        BookingTarget::listing(self.id, self.title.clone())
    }
}

// A safari package as shown on the safaris section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafariSummary {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub group_size: String,
    pub price: String,
    pub per_person: bool,
    pub seasonality: String,
    pub highlights: Vec<String>,
}

impl SafariSummary {
    pub fn target(&self) -> BookingTarget {
        BookingTarget::listing(self.id, self.title.clone())
    }
}

// Static listings published on the site.
#[derive(Debug, Clone)]
pub struct Catalog {
    properties: Vec<PropertySummary>,
    safaris: Vec<SafariSummary>,
}

impl Catalog {
    pub fn new(properties: Vec<PropertySummary>, safaris: Vec<SafariSummary>) -> Self {
        Self {
            properties,
            safaris,
        }
    }

    pub fn standard() -> Self {
        Self::new(standard_properties(), standard_safaris())
    }

    pub fn properties(&self) -> &[PropertySummary] {
        &self.properties
    }

    pub fn safaris(&self) -> &[SafariSummary] {
        &self.safaris
    }

    pub fn featured_properties(&self) -> impl Iterator<Item = &PropertySummary> {
        self.properties.iter().filter(|property| property.featured)
    }

    // Case-insensitive substring match on location; a blank area keeps everything.
    pub fn properties_in_area(&self, area: &str) -> Vec<&PropertySummary> {
        let needle = area.trim().to_lowercase();
        self.properties
            .iter()
            .filter(|property| {
                needle.is_empty() || property.location.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn property(&self, id: u32) -> Option<&PropertySummary> {
        self.properties.iter().find(|property| property.id == id)
    }

    pub fn safari(&self, id: u32) -> Option<&SafariSummary> {
        self.safaris.iter().find(|safari| safari.id == id)
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn standard_properties() -> Vec<PropertySummary> {
    vec![
        PropertySummary {
            id: 1,
            title: "Laurel Hill Apartments".to_string(),
            location: "Westlands, Nairobi".to_string(),
            price: "KSH 25,000,000".to_string(),
            listing_type: ListingType::Sale,
            bedrooms: 3,
            bathrooms: 2,
            featured: true,
            tags: tags(&["New", "Exclusive"]),
        },
        PropertySummary {
            id: 2,
            title: "Alba Gardens Apartments".to_string(),
            location: "Karen, Nairobi".to_string(),
            price: "KSH 80,000/month".to_string(),
            listing_type: ListingType::Rent,
            bedrooms: 4,
            bathrooms: 3,
            featured: true,
            tags: tags(&["Hot", "Furnished"]),
        },
        PropertySummary {
            id: 3,
            title: "108 Riverside Apartments".to_string(),
            location: "Riverside Drive, Nairobi".to_string(),
            price: "KSH 150,000/month".to_string(),
            listing_type: ListingType::Lease,
            bedrooms: 3,
            bathrooms: 2,
            featured: false,
            tags: tags(&["Reduced"]),
        },
    ]
}

fn standard_safaris() -> Vec<SafariSummary> {
    vec![
        SafariSummary {
            id: 1,
            title: "Masai Mara Wildlife Safari".to_string(),
            description: "Experience the Great Migration and witness the Big Five in their \
                          natural habitat."
                .to_string(),
            duration: "5 Days / 4 Nights".to_string(),
            group_size: "Up to 8 people".to_string(),
            price: "From KSH 120,000".to_string(),
            per_person: true,
            seasonality: "Best Jun–Oct; Dec–Feb".to_string(),
            highlights: tags(&["Game Drives", "Luxury Lodge", "All Meals", "Park Fees"]),
        },
        SafariSummary {
            id: 2,
            title: "Amboseli Elephant Safari".to_string(),
            description: "Get up close with majestic elephants with Mount Kilimanjaro as \
                          your backdrop."
                .to_string(),
            duration: "3 Days / 2 Nights".to_string(),
            group_size: "Up to 10 people".to_string(),
            price: "From KSH 75,000".to_string(),
            per_person: true,
            seasonality: "Best Jun–Oct; Jan–Feb".to_string(),
            highlights: tags(&["Elephant Viewing", "Kilimanjaro Views", "Photography", "Transport"]),
        },
    ]
}
