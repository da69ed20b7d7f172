//! Hebrew field names for the work-injury claim form.

use super::Text;

field_group! {
    /// A date split into its printed boxes.
    HebrewDate {
        day => "יום",
        month => "חודש",
        year => "שנה",
    }
}

field_group! {
    /// Postal address of the insured person.
    HebrewAddress {
        street => "רחוב",
        house_number => "מספר בית",
        entrance => "כניסה",
        apartment => "דירה",
        city => "ישוב",
        postal_code => "מיקוד",
        po_box => "תא דואר",
    }
}

field_group! {
    /// Section completed by the treating medical institution.
    HebrewMedicalFields {
        health_fund_member => "חבר בקופת חולים",
        nature_of_accident => "מהות התאונה",
        medical_diagnoses => "אבחנות רפואיות",
    }
}

form_record! {
    /// Work-injury claim form with Hebrew keys.
    HebrewRecord {
        last_name: Text => "שם משפחה",
        first_name: Text => "שם פרטי",
        id_number: Text => "מספר זהות",
        gender: Text => "מין",
        date_of_birth: HebrewDate => "תאריך לידה",
        address: HebrewAddress => "כתובת",
        landline_phone: Text => "טלפון קווי",
        mobile_phone: Text => "טלפון נייד",
        job_type: Text => "סוג העבודה",
        date_of_injury: HebrewDate => "תאריך הפגיעה",
        time_of_injury: Text => "שעת הפגיעה",
        accident_location: Text => "מקום התאונה",
        accident_address: Text => "כתובת מקום התאונה",
        accident_description: Text => "תיאור התאונה",
        injured_body_part: Text => "האיבר שנפגע",
        signature: Text => "חתימה",
        form_filling_date: HebrewDate => "תאריך מילוי הטופס",
        form_receipt_date_at_clinic: HebrewDate => "תאריך קבלת הטופס בקופה",
        medical_institution_fields: HebrewMedicalFields => "למילוי ע\"י המוסד הרפואי",
    }
}
