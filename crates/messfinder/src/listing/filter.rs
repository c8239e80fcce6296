use ahash::AHashSet;

use super::{FoodType, Listing, RoomType};

/// Inclusive rent bounds applied to a listing's cheapest room.
pub type PriceRange = (u32, u32);

/// Non-geographic criteria the listing feed applies before anything is ranked.
///
/// An empty filter matches every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring of name or address
    pub search_term: Option<String>,
    /// Case-insensitive substring of the address; `"all"` disables it
    pub location: Option<String>,
    pub price_range: Option<PriceRange>,
    /// A listing matches if it has a room of any selected type
    pub room_types: AHashSet<RoomType>,
    pub wifi: bool,
    pub food: bool,
    /// Only listings serving food of this type
    pub food_type: Option<FoodType>,
}

impl ListingFilter {
    pub fn builder() -> ListingFilterBuilder {
        ListingFilterBuilder::default()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(term) = active_text(self.search_term.as_deref()) {
            let term = term.to_lowercase();
            if !listing.name.to_lowercase().contains(&term)
                && !listing.address.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        if let Some(location) = active_text(self.location.as_deref())
            && !location.eq_ignore_ascii_case("all")
            && !listing
                .address
                .to_lowercase()
                .contains(&location.to_lowercase())
        {
            return false;
        }

        if let Some((min, max)) = self.price_range {
            match listing.cheapest_rent() {
                Some(rent) if (min..=max).contains(&rent) => {}
                _ => return false,
            }
        }

        if !self.room_types.is_empty()
            && !self
                .room_types
                .iter()
                .any(|room_type| listing.has_room_type(*room_type))
        {
            return false;
        }

        if self.wifi && !listing.amenities.wifi {
            return false;
        }
        if self.food && !listing.amenities.food {
            return false;
        }

        self.food_type.is_none_or(|wanted| {
            listing.amenities.food && listing.amenities.food_type == Some(wanted)
        })
    }

    /// Matching listings, in their original order.
    pub fn apply<'a>(&self, listings: impl IntoIterator<Item = &'a Listing>) -> Vec<&'a Listing> {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }
}

fn active_text(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Builder for [`ListingFilter`].
#[derive(Debug, Clone, Default)]
pub struct ListingFilterBuilder {
    filter: ListingFilter,
}

impl ListingFilterBuilder {
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.filter.search_term = Some(term.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.filter.location = Some(location.into());
        self
    }

    /// Bounds are swapped if given in the wrong order.
    pub fn price_range(mut self, min: u32, max: u32) -> Self {
        self.filter.price_range = Some((min.min(max), min.max(max)));
        self
    }

    pub fn room_type(mut self, room_type: RoomType) -> Self {
        self.filter.room_types.insert(room_type);
        self
    }

    pub fn wifi(mut self) -> Self {
        self.filter.wifi = true;
        self
    }

    pub fn food(mut self) -> Self {
        self.filter.food = true;
        self
    }

    pub fn food_type(mut self, food_type: FoodType) -> Self {
        self.filter.food_type = Some(food_type);
        self
    }

    pub fn build(self) -> ListingFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::test_support::{listing, room};

    fn sample() -> Vec<Listing> {
        let mut sunshine = listing("1", "Sunshine Mess", 18.5204, 73.8567);
        sunshine.address = "Near Engineering College, Pune".into();
        sunshine.rooms = vec![room(RoomType::Single, 8000), room(RoomType::Double, 6000)];
        sunshine.amenities.wifi = true;
        sunshine.amenities.food = true;
        sunshine.amenities.food_type = Some(FoodType::Both);

        let mut student = listing("2", "Student Haven", 19.0760, 72.8777);
        student.address = "College Road, Mumbai".into();
        student.rooms = vec![room(RoomType::Triple, 4500)];
        student.amenities.food = true;
        student.amenities.food_type = Some(FoodType::Veg);

        let mut royal = listing("3", "Royal Mess", 28.7041, 77.1025);
        royal.address = "North Campus, Delhi".into();
        royal.rooms = vec![room(RoomType::Single, 12000)];
        royal.amenities.wifi = true;

        vec![sunshine, student, royal]
    }

    fn ids(matched: &[&Listing]) -> Vec<String> {
        matched.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let listings = sample();
        let matched = ListingFilter::default().apply(&listings);
        assert_eq!(ids(&matched), ["1", "2", "3"]);
    }

    #[test]
    fn test_search_term_checks_name_and_address() {
        let listings = sample();
        let by_name = ListingFilter::builder().search_term("royal").build();
        assert_eq!(ids(&by_name.apply(&listings)), ["3"]);

        let by_address = ListingFilter::builder().search_term("COLLEGE").build();
        assert_eq!(ids(&by_address.apply(&listings)), ["1", "2"]);
    }

    #[test]
    fn test_location_all_and_blank_are_ignored() {
        let listings = sample();
        for location in ["all", "ALL", "", "   "] {
            let filter = ListingFilter::builder().location(location).build();
            assert_eq!(filter.apply(&listings).len(), 3, "location={location:?}");
        }
        let pune = ListingFilter::builder().location("pune").build();
        assert_eq!(ids(&pune.apply(&listings)), ["1"]);
    }

    #[test]
    fn test_price_uses_cheapest_room() {
        let listings = sample();
        // Sunshine's single room is 8000 but its cheapest room is 6000
        let filter = ListingFilter::builder().price_range(5000, 7000).build();
        assert_eq!(ids(&filter.apply(&listings)), ["1"]);

        let inclusive = ListingFilter::builder().price_range(4500, 6000).build();
        assert_eq!(ids(&inclusive.apply(&listings)), ["1", "2"]);

        let swapped = ListingFilter::builder().price_range(7000, 5000).build();
        assert_eq!(swapped.price_range, Some((5000, 7000)));
    }

    #[test]
    fn test_listing_without_rooms_fails_price_filter() {
        let mut empty = listing("9", "Empty Mess", 18.5, 73.8);
        empty.rooms.clear();
        let filter = ListingFilter::builder().price_range(0, 15000).build();
        assert!(!filter.matches(&empty));
        assert!(ListingFilter::default().matches(&empty));
    }

    #[test]
    fn test_room_types_match_any() {
        let listings = sample();
        let filter = ListingFilter::builder()
            .room_type(RoomType::Triple)
            .room_type(RoomType::Double)
            .build();
        assert_eq!(ids(&filter.apply(&listings)), ["1", "2"]);
    }

    #[test]
    fn test_amenity_flags() {
        let listings = sample();
        let wifi = ListingFilter::builder().wifi().build();
        assert_eq!(ids(&wifi.apply(&listings)), ["1", "3"]);

        let wifi_and_food = ListingFilter::builder().wifi().food().build();
        assert_eq!(ids(&wifi_and_food.apply(&listings)), ["1"]);
    }

    #[test]
    fn test_food_type_requires_food() {
        let mut listings = sample();
        let veg = ListingFilter::builder().food_type(FoodType::Veg).build();
        assert_eq!(ids(&veg.apply(&listings)), ["2"]);

        // a food type without food service does not count
        listings[1].amenities.food = false;
        assert!(veg.apply(&listings).is_empty());
    }
}
