//! Technology signature table.
//!
//! Each entry lists the evidence that identifies one technology. Matching is
//! substring-based for URLs and markers, selector-based for DOM attributes and
//! class names, and exact for runtime globals and header names.

/// Evidence identifying one technology.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub name: &'static str,
    /// Substrings of `script[src]` / `link[href]` values (compared lowercased)
    pub asset_urls: &'static [&'static str],
    /// Case-sensitive substrings of the page source
    pub markers: &'static [&'static str],
    /// CSS selectors for characteristic attributes and class names
    pub selectors: &'static [&'static str],
    /// JavaScript globals defined by the technology at runtime
    pub globals: &'static [&'static str],
    /// Response headers whose presence identifies the technology (lowercase)
    pub headers: &'static [&'static str],
}

const EMPTY: &[&str] = &[];

const fn sig(name: &'static str) -> Signature {
    Signature {
        name,
        asset_urls: EMPTY,
        markers: EMPTY,
        selectors: EMPTY,
        globals: EMPTY,
        headers: EMPTY,
    }
}

pub const SIGNATURES: &[Signature] = &[
    Signature {
        asset_urls: &["react.js", "react.min.js", "react-dom", "react.production"],
        selectors: &["[data-reactroot]", "[data-reactid]"],
        globals: &["React"],
        ..sig("React")
    },
    Signature {
        asset_urls: &["vue.js", "vue.min.js", "vue.global", "vue.runtime"],
        markers: &["__vue__"],
        globals: &["Vue", "__VUE__"],
        ..sig("Vue.js")
    },
    Signature {
        asset_urls: &["angular.js", "angular.min.js"],
        selectors: &["[ng-version]", "[ng-app]", "[ng-controller]"],
        globals: &["angular", "getAllAngularRootElements"],
        ..sig("Angular")
    },
    Signature {
        asset_urls: &["jquery"],
        globals: &["jQuery"],
        ..sig("jQuery")
    },
    Signature {
        asset_urls: &["bootstrap.js", "bootstrap.min.js", "bootstrap.bundle", "bootstrap.css", "bootstrap.min.css"],
        ..sig("Bootstrap")
    },
    Signature {
        asset_urls: &["/_next/"],
        markers: &["__NEXT_DATA__"],
        globals: &["__NEXT_DATA__"],
        ..sig("Next.js")
    },
    Signature {
        asset_urls: &["/_nuxt/"],
        markers: &["__NUXT__"],
        globals: &["__NUXT__", "$nuxt"],
        ..sig("Nuxt.js")
    },
    Signature {
        selectors: &["[class*='svelte-']"],
        ..sig("Svelte")
    },
    Signature {
        asset_urls: &["ember.js", "ember.min.js"],
        selectors: &[".ember-view"],
        globals: &["Ember"],
        ..sig("Ember.js")
    },
    Signature {
        selectors: &["[x-data]"],
        globals: &["Alpine"],
        ..sig("Alpine.js")
    },
    Signature {
        asset_urls: &["/wp-content/", "/wp-includes/"],
        selectors: &["[class*='wp-block-']"],
        globals: &["wp"],
        ..sig("WordPress")
    },
    Signature {
        asset_urls: &["/sites/default/files/", "drupal.js"],
        markers: &["drupal-settings-json"],
        globals: &["Drupal"],
        ..sig("Drupal")
    },
    Signature {
        asset_urls: &["cdn.shopify.com"],
        globals: &["Shopify"],
        ..sig("Shopify")
    },
    Signature {
        asset_urls: &["google-analytics.com/analytics.js", "googletagmanager.com/gtag/js"],
        globals: &["gtag"],
        ..sig("Google Analytics")
    },
    Signature {
        asset_urls: &["googletagmanager.com/gtm.js"],
        globals: &["google_tag_manager"],
        ..sig("Google Tag Manager")
    },
    Signature {
        headers: &["cf-ray"],
        ..sig("Cloudflare")
    },
    Signature {
        headers: &["x-vercel-id"],
        ..sig("Vercel")
    },
    Signature {
        headers: &["x-nf-request-id"],
        ..sig("Netlify")
    },
    Signature {
        headers: &["x-amz-cf-id"],
        ..sig("Amazon CloudFront")
    },
];

/// Every runtime global any signature looks for, in table order, deduplicated.
pub fn known_globals() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for name in SIGNATURES.iter().flat_map(|s| s.globals.iter().copied()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
