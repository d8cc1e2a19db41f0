use crate::page::PageAccessor;

const TITLE: &str = ".postingtitletext #titletextonly";
const PRICE: &str = ".postingtitletext .price";
const HOUSING: &str = ".postingtitletext .housing";
const LOCATION: &str = ".postingtitletext small";
const POSTED_AT: &str = ".postinginfo time";
const IMAGE_THUMBS: &str = "#thumbs .thumb";
const AMENITIES: &str = ".mapAndAttrs p.attrgroup:nth-of-type(2) span";
const MAP_LINK: &str = ".mapaddress a";
const BODY: &str = "#postingbody";

/// Per-page field strings as scraped, before normalization. Every field is
/// optional; a missing element simply leaves its field unset.
#[derive(Debug, Default, Clone)]
pub struct RawListing {
    pub title: Option<String>,
    pub price: Option<String>,
    pub housing: Option<String>,
    pub location: Option<String>,
    pub datetime: Option<String>,
    pub images: Option<Vec<String>>,
    pub attributes: Option<Vec<String>>,
    pub google_maps_link: Option<String>,
    pub description: Option<String>,
}

/// Read the raw listing fields off a rendered posting page. The second
/// attrgroup holds the amenity bubbles; the first repeats bedrooms/size.
pub fn scrape_listing(page: &dyn PageAccessor) -> RawListing {
    RawListing {
        title: page.text(TITLE),
        price: page.text(PRICE),
        housing: page.text(HOUSING),
        location: page.text(LOCATION),
        datetime: page.attr(POSTED_AT, "datetime"),
        images: page.attrs(IMAGE_THUMBS, "href"),
        attributes: page.texts(AMENITIES),
        google_maps_link: page.attr(MAP_LINK, "href"),
        description: page.text(BODY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::transform::transform;
    use crate::page::HtmlPage;

    fn fixture(name: &str) -> HtmlPage {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        HtmlPage::parse(&html)
    }

    #[test]
    fn posting_page_raw_fields() {
        let raw = scrape_listing(&fixture("listing"));
        assert_eq!(raw.title.as_deref(), Some("Sunny 2BR in Chelsea"));
        assert_eq!(raw.price.as_deref(), Some("$2350"));
        assert_eq!(raw.location.as_deref(), Some("(Chelsea)"));
        assert_eq!(raw.datetime.as_deref(), Some("2019-11-21T09:15:03-0500"));
        assert_eq!(raw.images.as_ref().map(|v| v.len()), Some(2));

        let attrs = raw.attributes.unwrap();
        assert!(attrs.iter().any(|a| a == "cats are OK - purrr"));
        // Bedrooms/size bubbles live in the first attrgroup, not here
        assert!(attrs.iter().all(|a| !a.contains("850ft2")));

        assert!(raw.google_maps_link.unwrap().contains("@40.744900"));
        assert!(raw.housing.unwrap().contains("2br"));
    }

    #[test]
    fn posting_page_normalizes() {
        let row = transform(&scrape_listing(&fixture("listing")));
        assert_eq!(row.title.as_deref(), Some("Sunny 2BR in Chelsea"));
        assert_eq!(row.price, 2350);
        assert_eq!(row.location.as_deref(), Some("Chelsea"));
        assert_eq!(row.bedroom_count.as_deref(), Some("2"));
        assert_eq!(row.size.as_deref(), Some("850"));
        assert_eq!(row.date_posted.as_deref(), Some("2019-11-21 09:15:03"));
        assert_eq!(row.latitude.as_deref(), Some("40.744900"));
        assert_eq!(row.longitude.as_deref(), Some("-73.996000"));
        assert!(row.images.contains("00101_1.jpg"));
        assert!(row.description.unwrap().contains("washer dryer"));
    }

    #[test]
    fn search_page_degrades_to_defaults() {
        let row = transform(&scrape_listing(&fixture("search")));
        assert_eq!(row.title, None);
        assert_eq!(row.price, 0);
        assert_eq!(row.attributes, "[]");
        assert_eq!(row.images, "[]");
        assert_eq!(row.date_posted, None);
    }
}
