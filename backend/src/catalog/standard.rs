//! Built-in agency rate card
//!
//! Hourly rates in cents (AUD, tax-exclusive). This is the default catalog
//! loaded by [`RateCatalog::standard`](super::RateCatalog::standard).

/// `(canonical name, hourly rate in cents)`
pub const STANDARD_RATE_CARD: &[(&str, i64)] = &[
    ("Account Management - (Senior Account Director)", 365_00),
    ("Account Management - (Account Director)", 295_00),
    ("Account Management - (Account Manager)", 180_00),
    ("Account Management (Off)", 120_00),
    ("Account Management - (Senior Account Manager)", 210_00),

    ("Project Management - (Account Director)", 295_00),
    ("Project Management - (Account Manager)", 180_00),
    ("Project Management - (Senior Account Manager)", 210_00),

    ("Tech - Delivery - Project Coordination", 110_00),
    ("Tech - Delivery - Project Management", 150_00),
    ("Tech - Head Of - Customer Experience Strategy", 365_00),
    ("Tech - Head Of - Program Strategy", 365_00),
    ("Tech - Head Of - Senior Project Management", 365_00),
    ("Tech - Head Of - System Setup", 365_00),
    ("Tech - Integrations", 170_00),
    ("Tech - Integrations (Srn MAP)", 295_00),
    ("Tech - Keyword Research", 120_00),
    ("Tech - Landing Page - (Offshore)", 120_00),
    ("Tech - Landing Page - (Onshore)", 210_00),
    ("Tech - Producer - Admin Configuration", 120_00),
    ("Tech - Producer - Campaign Build", 120_00),
    ("Tech - Producer - Chat Bot / Live Chat", 120_00),
    ("Tech - Producer - Copywriting", 120_00),
    ("Tech - Producer - Deployment", 120_00),
    ("Tech - Producer - Design", 120_00),
    ("Tech - Producer - Development", 120_00),
    ("Tech - Producer - Documentation Setup", 120_00),
    ("Tech - Producer - Email Production", 120_00),
    ("Tech - Producer - Field / Property Setup", 120_00),
    ("Tech - Producer - Integration Assistance", 120_00),
    ("Tech - Producer - Landing Page Production", 120_00),
    ("Tech - Producer - Lead Scoring Setup", 120_00),
    ("Tech - Producer - Reporting", 120_00),
    ("Tech - Producer - Services", 120_00),
    ("Tech - Producer - SMS Setup", 120_00),
    ("Tech - Producer - Support & Monitoring", 120_00),
    ("Tech - Producer - Testing", 120_00),
    ("Tech - Producer - Training", 120_00),
    ("Tech - Producer - Web Development", 120_00),
    ("Tech - Producer - Workflows", 120_00),
    ("Tech - SEO Producer", 120_00),
    ("Tech - SEO Strategy", 180_00),
    ("Tech - Specialist - Admin Configuration", 180_00),
    ("Tech - Specialist - Campaign Optimisation", 180_00),
    ("Tech - Specialist - Campaign Orchestration", 180_00),
    ("Tech - Specialist - Database Management", 180_00),
    ("Tech - Specialist - Email Production", 180_00),
    ("Tech - Specialist - Integration Configuration", 180_00),
    ("Tech - Specialist - Integration Services", 190_00),
    ("Tech - Specialist - Lead Scoring Setup", 180_00),
    ("Tech - Specialist - Program Management", 180_00),
    ("Tech - Specialist - Reporting", 180_00),
    ("Tech - Specialist - Services", 180_00),
    ("Tech - Specialist - Testing", 180_00),
    ("Tech - Specialist - Training", 180_00),
    ("Tech - Specialist - Workflows", 180_00),
    ("Tech - Sr. Architect - Approval & Testing", 365_00),
    ("Tech - Sr. Architect - Consultancy Services", 365_00),
    ("Tech - Sr. Architect - Data Strategy", 365_00),
    ("Tech - Sr. Architect - Integration Strategy", 365_00),
    ("Tech - Sr. Consultant - Admin Configuration", 295_00),
    ("Tech - Sr. Consultant - Advisory & Consultation", 295_00),
    ("Tech - Sr. Consultant - Approval & Testing", 295_00),
    ("Tech - Sr. Consultant - Campaign Optimisation", 295_00),
    ("Tech - Sr. Consultant - Campaign Strategy", 295_00),
    ("Tech - Sr. Consultant - Database Management", 295_00),
    ("Tech - Sr. Consultant - Reporting", 295_00),
    ("Tech - Sr. Consultant - Services", 295_00),
    ("Tech - Sr. Consultant - Strategy", 295_00),
    ("Tech - Sr. Consultant - Training", 295_00),
    ("Tech - Website Optimisation", 120_00),

    ("Content - Campaign Strategy (Onshore)", 180_00),
    ("Content - Keyword Research (Offshore)", 120_00),
    ("Content - Keyword Research (Onshore)", 150_00),
    ("Content - Optimisation (Onshore)", 150_00),
    ("Content - Reporting (Offshore)", 120_00),
    ("Content - Reporting (Onshore)", 150_00),
    ("Content - SEO Copywriting (Onshore)", 150_00),
    ("Content - SEO Strategy (Onshore)", 210_00),
    ("Content - Website Optimisations (Offshore)", 120_00),

    ("Copywriting (Offshore)", 120_00),
    ("Copywriting (Onshore)", 180_00),

    ("Design - Digital Asset (Offshore)", 140_00),
    ("Design - Digital Asset (Onshore)", 190_00),
    ("Design - Email (Offshore)", 120_00),
    ("Design - Email (Onshore)", 295_00),
    ("Design - Landing Page (Onshore)", 190_00),
    ("Design - Landing page (Offshore)", 120_00),

    ("Dev (orTech) - Landing Page - (Offshore)", 120_00),
    ("Dev (orTech) - Landing Page - (Onshore)", 210_00),
];
